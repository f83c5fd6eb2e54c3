//! Behavioural scenarios for `dropkit render` and `dropkit check`.

mod render;
