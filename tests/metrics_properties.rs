use adsmanager::campaign::Campaign;
use adsmanager::marketer::{Marketer, MarketerId, Status};
use adsmanager::metrics::{self, AggregateMetrics};
use proptest::prelude::*;
use proptest::test_runner::Config;

fn campaign_strategy() -> impl Strategy<Value = Campaign> {
    (
        (0.0..50_000.0f64, 0u64..10_000, 0u64..2_000_000, 0.0..100_000.0f64),
        (0u64..2_000, 0u64..1_000, 0.0..10.0f64, 0.0..5.0f64, 0u64..100_000),
    )
        .prop_map(
            |((spend, messages, reach, revenue), (leads, orders, ctr, freq, thru_play))| Campaign {
                spend,
                messages,
                reach,
                revenue,
                leads,
                orders,
                ctr,
                freq,
                thru_play,
                ..Default::default()
            },
        )
}

fn marketer(campaigns: Vec<Campaign>) -> Marketer {
    Marketer {
        id: MarketerId::new(),
        name: "Nguyen Van A".into(),
        email: "nva@example.com".into(),
        status: Status::Active,
        campaigns,
    }
}

fn assert_sane(m: &AggregateMetrics) -> Result<(), TestCaseError> {
    for value in [
        m.spend,
        m.revenue,
        m.cost_per_message,
        m.cpm,
        m.roas,
        m.lead_rate,
        m.cost_per_lead,
        m.cost_per_order,
        m.avg_ctr,
        m.avg_freq,
    ] {
        prop_assert!(value.is_finite());
        prop_assert!(value >= 0.0);
    }
    Ok(())
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn aggregate_ignores_campaign_order(
        (campaigns, shuffled) in prop::collection::vec(campaign_strategy(), 0..12)
            .prop_flat_map(|campaigns| (Just(campaigns.clone()), Just(campaigns).prop_shuffle()))
    ) {
        prop_assert_eq!(metrics::aggregate(&campaigns), metrics::aggregate(&shuffled));
    }

    #[test]
    fn portfolio_totals_add_up_per_marketer(
        portfolio in prop::collection::vec(prop::collection::vec(campaign_strategy(), 0..5), 0..6)
    ) {
        let marketers: Vec<Marketer> = portfolio.into_iter().map(marketer).collect();
        let totals = metrics::aggregate_all(&marketers);
        let breakdown = metrics::breakdown(&marketers);

        prop_assert_eq!(breakdown.len(), marketers.len());
        prop_assert_eq!(
            totals.campaign_count,
            breakdown.iter().map(|b| b.metrics.campaign_count).sum::<u64>()
        );
        prop_assert_eq!(totals.messages, breakdown.iter().map(|b| b.metrics.messages).sum::<u64>());
        prop_assert_eq!(totals.reach, breakdown.iter().map(|b| b.metrics.reach).sum::<u64>());
        prop_assert_eq!(totals.leads, breakdown.iter().map(|b| b.metrics.leads).sum::<u64>());
        prop_assert_eq!(totals.orders, breakdown.iter().map(|b| b.metrics.orders).sum::<u64>());
        prop_assert_eq!(totals.thru_play, breakdown.iter().map(|b| b.metrics.thru_play).sum::<u64>());

        let spend: f64 = breakdown.iter().map(|b| b.metrics.spend).sum();
        prop_assert!((totals.spend - spend).abs() <= 1e-6 * spend.max(1.0));
        let revenue: f64 = breakdown.iter().map(|b| b.metrics.revenue).sum();
        prop_assert!((totals.revenue - revenue).abs() <= 1e-6 * revenue.max(1.0));
    }

    #[test]
    fn ratios_are_recomputed_from_sums(
        campaigns in prop::collection::vec(campaign_strategy(), 1..10)
    ) {
        let totals = metrics::aggregate(&campaigns);

        let expected_cpm = if totals.reach == 0 {
            0.0
        } else {
            totals.spend * 1000.0 / totals.reach as f64
        };
        let expected_roas = if totals.spend == 0.0 { 0.0 } else { totals.revenue / totals.spend };

        prop_assert_eq!(totals.cpm, expected_cpm);
        prop_assert_eq!(totals.roas, expected_roas);
        assert_sane(&totals)?;
    }

    #[test]
    fn garbage_inputs_never_leak_into_results(
        spend in any::<f64>(),
        revenue in any::<f64>(),
        ctr in any::<f64>(),
        messages in any::<u64>(),
        reach in any::<u64>(),
    ) {
        let campaigns = vec![
            Campaign { spend, revenue, ctr, messages, reach, ..Default::default() },
            Campaign { spend, revenue, ctr, messages, reach, ..Default::default() },
        ];

        let totals = metrics::aggregate(&campaigns);
        assert_sane(&totals)?;
        prop_assert_eq!(totals.campaign_count, 2);
        prop_assert_eq!(totals.messages, messages.saturating_mul(2));
    }
}

#[test]
fn roas_is_revenue_over_spend() {
    let campaigns = vec![
        Campaign {
            spend: 1000.0,
            revenue: 2000.0,
            ..Default::default()
        },
        Campaign {
            spend: 3000.0,
            revenue: 5000.0,
            ..Default::default()
        },
    ];

    let totals = metrics::aggregate(&campaigns);

    assert_eq!(totals.spend, 4000.0);
    assert_eq!(totals.revenue, 7000.0);
    assert_eq!(totals.roas, 1.75);
}

#[test]
fn empty_portfolio_is_all_zero() {
    assert_eq!(metrics::aggregate_all(&[]), AggregateMetrics::default());
    assert!(metrics::breakdown(&[]).is_empty());
}
