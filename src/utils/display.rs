//! Display and printing utilities

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;

use crate::types::ProtocolOverview;

/// Formats a fractional change as a signed percentage, or "-" when the
/// figure could not be computed (zero or absent past value).
pub fn format_change(change: Option<Decimal>) -> String {
    match change {
        Some(c) => {
            let pct = c * dec!(100);
            if pct.is_sign_negative() {
                format!("{:.2}%", pct)
            } else {
                format!("+{:.2}%", pct)
            }
        }
        None => "-".to_string(),
    }
}

/// Formats an APY fraction as a percentage, "-" while unresolved.
pub fn format_apy(apy: Option<Decimal>) -> String {
    match apy {
        Some(a) => format!("{:.2}%", a * dec!(100)),
        None => "-".to_string(),
    }
}

pub fn print_overview(overview: &ProtocolOverview) {
    info!("\n📊 Balanced Protocol Overview ({})", overview.timestamp.format("%Y-%m-%d %H:%M:%S UTC"));
    info!("   💰 TVL: ${:.2}", overview.tvl_usd);
    info!("      Pools ({}): ${:.2}", overview.pools.len(), overview.pools_tvl_usd);
    info!("      Collateral:  ${:.2}", overview.collateral_usd);

    info!("   💧 POOLS:");
    for pool in &overview.pools {
        info!(
            "      #{:<3} {:<12} vol ${:<12.2} fees ${:<10.2} APY {}",
            pool.pool_id,
            pool.name(),
            pool.volume_usd,
            pool.fees_usd,
            format_apy(pool.apy),
        );
    }

    if let Some(income) = &overview.income {
        info!("   📈 INCOME ({} → {}):",
            income.window_start.format("%m-%d %H:%M"),
            income.window_end.format("%m-%d %H:%M"),
        );
        for line in &income.lines {
            info!(
                "      {:<10} {:>14.4} {} (${:.2})",
                line.contract, line.income_tokens, line.token_symbol, line.income_usd
            );
        }
        info!("      Total: ${:.2} ({} vs prior period)",
            income.total_income_usd,
            format_change(income.change_vs_prior),
        );
    } else {
        info!("   📈 INCOME: loading...");
    }

    if let Some(holdings) = &overview.holdings {
        info!("   🏦 DAO HOLDINGS:");
        for entry in &holdings.entries {
            match entry.value_usd {
                Some(usd) => info!("      {:<6} {:>16.4} (${:.2})", entry.symbol, entry.amount, usd),
                None => info!("      {:<6} {:>16.4} (no rate)", entry.symbol, entry.amount),
            }
        }
        info!("      Total: ${:.2} ({} vs prior period)",
            holdings.total_usd,
            format_change(holdings.change_vs_prior),
        );
    } else {
        info!("   🏦 DAO HOLDINGS: loading...");
    }

    print_burn_schedule(overview);
}

pub fn print_burn_schedule(overview: &ProtocolOverview) {
    if overview.weekly_burns.is_empty() {
        return;
    }

    let resolved: Decimal = overview
        .weekly_burns
        .iter()
        .filter_map(|b| b.burned)
        .sum();
    let last = overview.weekly_burns.last();

    info!("   🔥 BURNS: {:.2} total across {} weeks", resolved, overview.weekly_burns.len());
    if let Some(bucket) = last {
        if bucket.pending {
            match bucket.burned {
                Some(amount) => info!("      Current week (pending): {:.2}", amount),
                None => info!("      Current week (pending): -"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn change_formats_as_signed_percent_or_dash() {
        assert_eq!(format_change(Some(dec!(0.5))), "+50.00%");
        assert_eq!(format_change(Some(dec!(-0.25))), "-25.00%");
        assert_eq!(format_change(None), "-");
    }

    #[test]
    fn apy_formats_as_percent_or_dash() {
        assert_eq!(format_apy(Some(dec!(14.6))), "1460.00%");
        assert_eq!(format_apy(None), "-");
    }
}
