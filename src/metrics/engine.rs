//! Stats engine: owns the cached queries and assembles the overview
//!
//! The engine is constructed explicitly at the composition root and holds
//! the typed contract interfaces, the backend client and one cache entry
//! per remote query. Derived figures are computed only once every input
//! they depend on has resolved; until then the engine reports them as
//! still loading.

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::{
    backend::{BackendClient, BlockAtTime, TokenStats},
    cache::{CachedQuery, KeyedCache, QueryState},
    chain::{
        AggregateCall, DexContract, LoansContract, MulticallContract, RewardsContract,
        StakedLpContract, TokenContract, decode_u256,
    },
    config::{
        Config, BLOCK_LOOKUP_TTL_SECS, BURN_READING_TTL_SECS, BURN_TRACKING_EPOCH_MS,
        POOLS_TTL_SECS, RATES_TTL_SECS,
    },
    errors::{StatsError, StatsResult},
    metrics::{
        assign_burn_amounts, bucket_boundaries, build_rate_table, compute_tvl, holdings_snapshot,
        percent_change, reconcile_fee_income, reward_apy, total_income_usd, weekly_buckets,
        ApyInputs,
    },
    types::{
        token_by_symbol, BurnBucket, CollateralPosition, HoldingsSnapshot, IncomeStatement,
        PairRecord, PeriodWindow, ProtocolOverview, RateTable, RawQuotePoint, BALN_TOKEN,
        DAO_FUND_CONTRACT, DEX_CONTRACT, LOANS_CONTRACT, REWARDS_CONTRACT, STAKED_LP_CONTRACT,
        TRACKED_TOKENS,
    },
    utils::scale_u256,
    ConcreteProvider,
};

pub struct StatsEngine {
    config: Config,
    backend: BackendClient,
    baln: TokenContract,
    rewards: RewardsContract,
    dex: DexContract,
    staked_lp: StakedLpContract,
    loans: LoansContract,
    multicall: MulticallContract,
    rates_query: CachedQuery<RateTable>,
    pools_query: CachedQuery<Vec<PairRecord>>,
    collateral_query: CachedQuery<Vec<CollateralPosition>>,
    block_lookups: KeyedCache<i64, BlockAtTime>,
    burn_readings: KeyedCache<i64, RawQuotePoint>,
}

impl StatsEngine {
    pub fn new(config: &Config, provider: Arc<ConcreteProvider>, backend: BackendClient) -> Self {
        Self {
            config: config.clone(),
            backend,
            baln: TokenContract::new(BALN_TOKEN, provider.clone()),
            rewards: RewardsContract::new(REWARDS_CONTRACT, provider.clone()),
            dex: DexContract::new(DEX_CONTRACT, provider.clone()),
            staked_lp: StakedLpContract::new(STAKED_LP_CONTRACT, provider.clone()),
            loans: LoansContract::new(LOANS_CONTRACT, provider.clone()),
            multicall: MulticallContract::new(provider),
            rates_query: CachedQuery::new("rates", Duration::from_secs(RATES_TTL_SECS)),
            pools_query: CachedQuery::new("pools", Duration::from_secs(POOLS_TTL_SECS)),
            collateral_query: CachedQuery::new(
                "collateral",
                Duration::from_secs(POOLS_TTL_SECS),
            ),
            block_lookups: KeyedCache::new(Duration::from_secs(BLOCK_LOOKUP_TTL_SECS)),
            burn_readings: KeyedCache::new(Duration::from_secs(BURN_READING_TTL_SECS)),
        }
    }

    /// Refreshes the symbol → USD rate table from backend token stats.
    pub async fn refresh_rates(&self) -> QueryState<RateTable> {
        self.rates_query
            .get_or_refresh(|| async {
                let stats = self.backend.fetch_token_stats().await?;
                Ok(build_rate_table(&stats))
            })
            .await
    }

    /// Refreshes pool records. Depends on the rate table: until rates have
    /// resolved this query stays inactive and reports loading.
    pub async fn refresh_pools(&self) -> QueryState<Vec<PairRecord>> {
        let rates = self.rates_query.state().await;
        let Some(rates) = rates.data else {
            return self.pools_query.state().await;
        };

        self.pools_query
            .get_or_refresh(|| async move { self.fetch_pools(&rates).await })
            .await
    }

    async fn fetch_pools(&self, rates: &RateTable) -> StatsResult<Vec<PairRecord>> {
        let stats = self.backend.fetch_pool_stats().await?;

        let emission_raw = self.rewards.daily_emission().await?;
        let daily_emission = scale_u256(emission_raw, 18)?;
        let baln_price = rates.rate("BALN");

        let mut pools = Vec::with_capacity(stats.len());
        for stat in stats {
            let mut record = PairRecord {
                pool_id: stat.pool_id,
                base_symbol: stat.base_symbol,
                quote_symbol: stat.quote_symbol,
                base_liquidity: stat.base_liquidity,
                quote_liquidity: stat.quote_liquidity,
                volume_usd: stat.volume_24h_usd,
                fees_usd: stat.fees_24h_usd,
                apy: None,
            };

            let staked_ratio = match self.staked_ratio(record.pool_id).await {
                Ok(ratio) => ratio,
                Err(e) => {
                    warn!("Staked ratio unavailable for pool {}: {}", record.pool_id, e);
                    None
                }
            };

            record.apy = match (baln_price, record.liquidity_usd(rates)) {
                (Some(price), Some(tvl)) => reward_apy(&ApyInputs {
                    pool_id: record.pool_id,
                    daily_emission,
                    allocation_fraction: self.config.lp_allocation,
                    reward_token_price: price,
                    staked_ratio,
                    pool_tvl_usd: tvl,
                }),
                _ => None,
            };

            pools.push(record);
        }
        Ok(pools)
    }

    /// Staked LP supply over total LP supply; None while either read is
    /// zero (no LP tokens minted yet means no meaningful ratio).
    async fn staked_ratio(&self, pool_id: u32) -> StatsResult<Option<Decimal>> {
        let total = self.dex.lp_supply(pool_id).await?;
        if total.is_zero() {
            return Ok(None);
        }
        let staked = self.staked_lp.total_staked(pool_id).await?;
        let total = scale_u256(total, 18)?;
        let staked = scale_u256(staked, 18)?;
        Ok(Some(staked / total))
    }

    /// Refreshes collateral-vault balances per tracked token.
    pub async fn refresh_collateral(&self) -> QueryState<Vec<CollateralPosition>> {
        self.collateral_query
            .get_or_refresh(|| async {
                let mut positions = Vec::with_capacity(TRACKED_TOKENS.len());
                for token in TRACKED_TOKENS {
                    let raw = self.loans.collateral_total(token.address, None).await?;
                    positions.push(CollateralPosition {
                        symbol: token.symbol.to_string(),
                        amount: scale_u256(raw, token.decimals)?,
                    });
                }
                Ok(positions)
            })
            .await
    }

    /// Stats for a single token looked up by ticker. An unrecognized ticker
    /// is a contained error the caller renders as a not-found message, not
    /// a failure of the whole cycle.
    pub async fn token_detail(&self, symbol: &str) -> StatsResult<TokenStats> {
        // Unrecognized tickers fail before any backend round trip.
        let token = token_by_symbol(symbol).ok_or_else(|| StatsError::UnknownToken {
            symbol: symbol.to_string(),
        })?;
        let stats = self.backend.fetch_token_stats().await?;
        stats
            .into_iter()
            .find(|t| t.symbol == token.symbol)
            .ok_or_else(|| StatsError::UnknownToken {
                symbol: symbol.to_string(),
            })
    }

    /// Block height at (or just before) a timestamp, deduplicated per key:
    /// sibling metrics asking for the same boundary share one lookup.
    pub async fn block_for(&self, timestamp_ms: i64) -> StatsResult<Arc<BlockAtTime>> {
        self.block_lookups
            .get_or_fetch(timestamp_ms, || async {
                self.backend.block_at_timestamp(timestamp_ms).await
            })
            .await
    }

    /// Period-over-period income statement: fee balances reconciled between
    /// the window's boundary heights, with a change figure vs the preceding
    /// window of equal length.
    pub async fn income_statement(
        &self,
        window: PeriodWindow,
        rates: &RateTable,
    ) -> StatsResult<IncomeStatement> {
        let start_block = self.block_for(window.start_ms).await?;
        let end_block = self.block_for(window.end_ms).await?;

        let start_fees = self.backend.fetch_fee_totals(start_block.number).await?;
        let end_fees = self.backend.fetch_fee_totals(end_block.number).await?;
        let lines = reconcile_fee_income(&start_fees, &end_fees, rates);
        let total = total_income_usd(&lines);

        // Same reconciliation over the preceding window for the change figure.
        let prior = window.preceding();
        let change_vs_prior = match self.block_for(prior.start_ms).await {
            Ok(prior_block) => match self.backend.fetch_fee_totals(prior_block.number).await {
                Ok(prior_fees) => {
                    let prior_lines = reconcile_fee_income(&prior_fees, &start_fees, rates);
                    percent_change(Some(total_income_usd(&prior_lines)), total)
                }
                Err(e) => {
                    warn!("Prior-period fee totals unavailable: {}", e);
                    None
                }
            },
            Err(e) => {
                warn!("Prior-period block lookup failed: {}", e);
                None
            }
        };

        Ok(IncomeStatement {
            window_start: millis_to_datetime(window.start_ms)?,
            window_end: millis_to_datetime(window.end_ms)?,
            lines,
            total_income_usd: total,
            change_vs_prior,
        })
    }

    /// DAO treasury balances per tracked token, batched into one multicall
    /// round trip; the prior-window total drives the change figure.
    pub async fn holdings(
        &self,
        window: PeriodWindow,
        rates: &RateTable,
    ) -> StatsResult<HoldingsSnapshot> {
        let current = self.dao_fund_balances(None).await?;

        let prior_total = match self.block_for(window.start_ms).await {
            Ok(block) => match self.dao_fund_balances(Some(block.number)).await {
                Ok(past) => Some(
                    past.iter()
                        .filter_map(|(symbol, amount)| rates.usd_value(symbol, *amount))
                        .sum(),
                ),
                Err(e) => {
                    warn!("Prior-period holdings unavailable: {}", e);
                    None
                }
            },
            Err(e) => {
                warn!("Prior-period block lookup failed: {}", e);
                None
            }
        };

        Ok(holdings_snapshot(Utc::now(), &current, rates, prior_total))
    }

    async fn dao_fund_balances(&self, at: Option<u64>) -> StatsResult<Vec<(String, Decimal)>> {
        let calls: Vec<AggregateCall> = TRACKED_TOKENS
            .iter()
            .map(|t| AggregateCall::balance_of(t.address, DAO_FUND_CONTRACT))
            .collect();

        let (_, returns) = self.multicall.aggregate(&calls, at).await?;

        TRACKED_TOKENS
            .iter()
            .zip(returns.iter())
            .map(|(token, raw)| {
                let amount = scale_u256(decode_u256(raw)?, token.decimals)?;
                Ok((token.symbol.to_string(), amount))
            })
            .collect()
    }

    /// Weekly burn schedule from the tracking epoch to now: the burn-counter
    /// delta between each bucket's boundary heights.
    pub async fn weekly_burns(&self, now_ms: i64) -> StatsResult<Vec<BurnBucket>> {
        let mut buckets = weekly_buckets(BURN_TRACKING_EPOCH_MS, now_ms);
        if buckets.is_empty() {
            return Ok(buckets);
        }

        // Past boundaries are pinned to immutable heights, so their readings
        // are cached; only the trailing "now" boundary is read fresh.
        let mut readings = Vec::with_capacity(buckets.len() + 1);
        for boundary in bucket_boundaries(&buckets) {
            let reading = self
                .burn_readings
                .get_or_fetch(boundary, || async {
                    let block = self.block_for(boundary).await?;
                    let raw = self.baln.burned_total(Some(block.number)).await?;
                    Ok(RawQuotePoint::new(boundary, scale_u256(raw, 18)?))
                })
                .await?;
            readings.push((*reading).clone());
        }

        assign_burn_amounts(&mut buckets, &readings);
        Ok(buckets)
    }

    /// Assembles the top-level overview once every required input has
    /// resolved; returns None (still loading) otherwise. Optional sections
    /// that fail are logged and omitted rather than blocking the overview.
    pub async fn overview(&self, now_ms: i64) -> Option<ProtocolOverview> {
        let rates = self.rates_query.state().await.data?;
        let pools = self.pools_query.state().await.data?;
        let collateral = self.collateral_query.state().await.data?;

        let tvl = compute_tvl(&pools, &collateral, &rates);
        let window = PeriodWindow::from_days_back(now_ms, self.config.comparison_days);

        let income = match self.income_statement(window, &rates).await {
            Ok(statement) => Some(statement),
            Err(e) => {
                warn!("Income statement unavailable this cycle: {}", e);
                None
            }
        };

        let holdings = match self.holdings(window, &rates).await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!("Holdings unavailable this cycle: {}", e);
                None
            }
        };

        let weekly_burns = match self.weekly_burns(now_ms).await {
            Ok(buckets) => buckets,
            Err(e) => {
                warn!("Burn schedule unavailable this cycle: {}", e);
                Vec::new()
            }
        };

        Some(ProtocolOverview {
            timestamp: Utc::now(),
            tvl_usd: tvl.total_usd,
            pools_tvl_usd: tvl.pools_usd,
            collateral_usd: tvl.collateral_usd,
            pools: (*pools).clone(),
            income,
            holdings,
            weekly_burns,
        })
    }
}

fn millis_to_datetime(ms: i64) -> StatsResult<chrono::DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| StatsError::DataShape {
            context: format!("invalid millisecond timestamp {}", ms),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::providers::ProviderBuilder;
    use rust_decimal_macros::dec;

    fn test_config(server_url: &str) -> Config {
        Config {
            rpc_url: "http://127.0.0.1:9".to_string(),
            stats_api_url: server_url.to_string(),
            blocks_api_url: server_url.to_string(),
            refresh_interval_secs: 60,
            comparison_days: 1,
            lp_allocation: dec!(0.1),
            http_timeout_secs: 2,
        }
    }

    fn test_engine(server_url: &str) -> StatsEngine {
        let config = test_config(server_url);
        // Provider construction is lazy; no node is contacted here.
        let provider: Arc<ConcreteProvider> = Arc::new(
            ProviderBuilder::new()
                .on_http(config.rpc_url.parse().unwrap())
                .boxed(),
        );
        let backend = BackendClient::new(
            reqwest::Client::new(),
            config.stats_api_url.clone(),
            config.blocks_api_url.clone(),
        );
        StatsEngine::new(&config, provider, backend)
    }

    #[tokio::test]
    async fn overview_stays_loading_until_every_input_resolves() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/tokens")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"symbol":"BALN","name":"Balance Token","price":0.25,"total_supply":1}]"#)
            .create_async()
            .await;

        let engine = test_engine(&server.url());

        assert!(engine.overview(1_700_000_000_000).await.is_none());

        let rates = engine.refresh_rates().await;
        assert!(rates.ready());

        // Pools and collateral have not resolved, so the overview must not
        // be presented as a partially-combined result.
        assert!(engine.overview(1_700_000_000_000).await.is_none());
    }

    #[tokio::test]
    async fn pool_refresh_is_inactive_until_rates_resolve() {
        let mut server = mockito::Server::new_async().await;
        let pools_mock = server
            .mock("GET", "/pools")
            .with_status(200)
            .with_body("[]")
            .expect(0)
            .create_async()
            .await;

        let engine = test_engine(&server.url());
        let state = engine.refresh_pools().await;

        assert!(!state.ready());
        pools_mock.assert_async().await;
    }

    #[tokio::test]
    async fn unknown_ticker_is_a_contained_not_found_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/tokens")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"symbol":"BALN","name":"Balance Token","price":0.25,"total_supply":1}]"#)
            .expect_at_least(1)
            .create_async()
            .await;

        let engine = test_engine(&server.url());

        let found = engine.token_detail("baln").await.unwrap();
        assert_eq!(found.symbol, "BALN");

        let missing = engine.token_detail("NOPE").await;
        assert!(matches!(missing, Err(StatsError::UnknownToken { .. })));
    }
}
