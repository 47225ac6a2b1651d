use opentelemetry::{KeyValue, metrics::UpDownCounter};
use std::sync::LazyLock;

static STATDS: LazyLock<UpDownCounter<i64>> = LazyLock::new(|| {
    logfire::i64_up_down_counter("petglow_statds")
        .with_description("PetGlow dashboard statistics")
        .with_unit("attempt")
        .build()
});

fn incr_statds(metric: &'static str, value: &str) {
    STATDS.add(1, &[KeyValue::new(metric, value.to_string())]);
}

pub fn incr_user_action_statds(action: &str) {
    incr_statds("user_action", action)
}

pub fn incr_board_action_statds(action: &str) {
    incr_statds("board_action", action)
}
