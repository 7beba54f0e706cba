//! Colored rendering for the command-line reports.

use alloy::primitives::U256;
use owo_colors::OwoColorize;

/// Renders a gas amount, colored by how expensive the deployment was.
pub fn format_gas(gas: U256) -> String {
    let gas: u64 = gas.try_into().unwrap_or(u64::MAX);
    let text = format!("{gas} gas");
    match gas {
        0..=1_500_000 => text.bright_green().to_string(),
        1_500_001..=5_000_000 => text.yellow().to_string(),
        _ => text.bright_purple().to_string(),
    }
}

/// Renders the confirmation wait for a network.
pub fn format_wait(confirmations: u64, block_time: u64) -> String {
    format!(
        "{confirmations} confirmations (~{}s)",
        confirmations * block_time
    )
}

#[cfg(test)]
mod tests {
    use super::format_wait;

    #[test]
    fn wait_estimate() {
        assert_eq!("2 confirmations (~6s)", format_wait(2, 3));
        assert_eq!("6 confirmations (~72s)", format_wait(6, 12));
    }
}
