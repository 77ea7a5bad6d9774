// Diesel table definitions matching migrations/.

diesel::table! {
    outcomes (draw_date) {
        draw_date -> Text,
        primary_numbers -> Text,
        secondary_number -> Integer,
        status -> Text,
        evaluated_tickets -> Integer,
        recorded_at -> Text,
    }
}

diesel::table! {
    tickets (id) {
        id -> Text,
        target -> Text,
        primary_numbers -> Text,
        secondary_number -> Integer,
        origin_strategy -> Text,
        confidence -> Double,
        generation_mode -> Text,
        created_at -> Text,
    }
}

diesel::table! {
    evaluations (ticket_id) {
        ticket_id -> Text,
        draw_date -> Text,
        origin_strategy -> Text,
        primary_matches -> Integer,
        secondary_match -> Bool,
        prize_tier -> Text,
        prize_value -> Text,
        evaluated_at -> Text,
    }
}

diesel::table! {
    strategy_weights (strategy) {
        strategy -> Text,
        weight -> Double,
        updated_at -> Text,
    }
}

diesel::table! {
    strategy_performance (strategy) {
        strategy -> Text,
        window_samples -> Text,
        total_plays -> BigInt,
        total_wins -> BigInt,
        roi -> Double,
        win_rate -> Double,
        current_weight -> Double,
        last_updated -> Text,
    }
}

diesel::joinable!(evaluations -> tickets (ticket_id));

diesel::allow_tables_to_appear_in_same_query!(
    evaluations,
    outcomes,
    strategy_performance,
    strategy_weights,
    tickets,
);
