//! Step definitions, fixtures, and scenarios for the render CLI.

mod bdd_steps;
mod scenarios;
mod test_helpers;
