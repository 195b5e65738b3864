//! Campaign aggregation and derived metrics.
//!
//! Everything here is a pure function of its input. Summed fields add up
//! across campaigns; ratios are always recomputed from the sums and never
//! averaged from per-campaign ratios. Every guarded division yields `0`.

use serde::{Deserialize, Serialize};

use crate::campaign::Campaign;
use crate::marketer::{Marketer, MarketerId, Status};
use crate::utils::sanitize_amount;

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateMetrics {
    pub campaign_count: u64,
    pub spend: f64,
    pub messages: u64,
    pub reach: u64,
    pub leads: u64,
    pub orders: u64,
    pub revenue: f64,
    pub thru_play: u64,
    pub cost_per_message: f64,
    pub cpm: f64,
    pub roas: f64,
    pub lead_rate: f64,
    pub cost_per_lead: f64,
    pub cost_per_order: f64,
    pub avg_ctr: f64,
    pub avg_freq: f64,
}

/// Per-marketer aggregate, in the order the marketers were given.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct MarketerMetrics {
    pub marketer_id: MarketerId,
    pub name: String,
    pub status: Status,
    pub metrics: AggregateMetrics,
}

pub fn aggregate<'a, I>(campaigns: I) -> AggregateMetrics
where
    I: IntoIterator<Item = &'a Campaign>,
{
    let mut spend = Vec::new();
    let mut revenue = Vec::new();
    let mut ctr = Vec::new();
    let mut freq = Vec::new();
    let mut totals = AggregateMetrics::default();

    for campaign in campaigns {
        totals.campaign_count = totals.campaign_count.saturating_add(1);
        totals.messages = totals.messages.saturating_add(campaign.messages);
        totals.reach = totals.reach.saturating_add(campaign.reach);
        totals.leads = totals.leads.saturating_add(campaign.leads);
        totals.orders = totals.orders.saturating_add(campaign.orders);
        totals.thru_play = totals.thru_play.saturating_add(campaign.thru_play);
        spend.push(sanitize_amount(campaign.spend));
        revenue.push(sanitize_amount(campaign.revenue));
        ctr.push(sanitize_amount(campaign.ctr));
        freq.push(sanitize_amount(campaign.freq));
    }

    totals.spend = canonical_sum(spend);
    totals.revenue = canonical_sum(revenue);
    totals.avg_ctr = guarded_div(canonical_sum(ctr), totals.campaign_count as f64);
    totals.avg_freq = guarded_div(canonical_sum(freq), totals.campaign_count as f64);

    totals.cost_per_message = guarded_div(totals.spend, totals.messages as f64);
    totals.cpm = guarded_div(totals.spend * 1000.0, totals.reach as f64);
    totals.roas = guarded_div(totals.revenue, totals.spend);
    totals.lead_rate = guarded_div(totals.leads as f64 * 100.0, totals.messages as f64);
    totals.cost_per_lead = guarded_div(totals.spend, totals.leads as f64);
    totals.cost_per_order = guarded_div(totals.spend, totals.orders as f64);

    totals
}

/// Portfolio totals over every campaign of every marketer.
pub fn aggregate_all(marketers: &[Marketer]) -> AggregateMetrics {
    aggregate(marketers.iter().flat_map(|marketer| &marketer.campaigns))
}

pub fn breakdown(marketers: &[Marketer]) -> Vec<MarketerMetrics> {
    marketers
        .iter()
        .map(|marketer| MarketerMetrics {
            marketer_id: marketer.id.clone(),
            name: marketer.name.clone(),
            status: marketer.status,
            metrics: aggregate(&marketer.campaigns),
        })
        .collect()
}

/// Derived values for one campaign, recomputed from its raw fields.
pub fn campaign_metrics(campaign: &Campaign) -> AggregateMetrics {
    aggregate(std::iter::once(campaign))
}

// Sorting first makes the sum independent of input order, bit for bit.
fn canonical_sum(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    let sum: f64 = values.into_iter().sum();
    if sum.is_finite() {
        sum
    } else {
        f64::MAX
    }
}

fn guarded_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }

    let value = numerator / denominator;
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
