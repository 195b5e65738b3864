use crate::campaign::Campaign;
use crate::database::Database;
use crate::error::Error;
use crate::marketer::{NewMarketer, Status};

#[allow(clippy::too_many_arguments)]
fn campaign(
    id: &str,
    name: &str,
    spend: f64,
    messages: u64,
    reach: u64,
    ctr: f64,
    freq: f64,
    thru_play: u64,
    revenue: f64,
) -> Campaign {
    Campaign {
        id: id.parse().unwrap_or_default(),
        name: name.to_string(),
        spend,
        messages,
        reach,
        leads: messages / 4,
        orders: messages / 8,
        revenue,
        ctr,
        freq,
        thru_play,
        cost_per_message: None,
        cpm: None,
    }
}

fn marketer(name: &str, email: &str, status: Status, campaigns: Vec<Campaign>) -> NewMarketer {
    NewMarketer {
        name: name.to_string(),
        email: email.to_string(),
        status,
        campaigns,
    }
}

pub fn demo_marketers() -> Vec<NewMarketer> {
    vec![
        marketer(
            "Nguyen Van A",
            "nva@example.com",
            Status::Active,
            vec![campaign(
                "C-001", "Spring Sale 2026", 4500.0, 1200, 450000, 2.1, 1.2, 12500, 13500.0,
            )],
        ),
        marketer(
            "Tran Thi B",
            "ttb@example.com",
            Status::Active,
            vec![
                campaign(
                    "C-002", "Retargeting Cart", 3200.0, 950, 120000, 3.5, 2.1, 8400, 14400.0,
                ),
                campaign(
                    "C-003", "Brand Awareness Q1", 8500.0, 450, 850000, 1.1, 1.1, 45000, 38250.0,
                ),
            ],
        ),
        marketer(
            "Hoang To E",
            "hte@example.com",
            Status::Active,
            vec![campaign(
                "C-004", "Lookalike High LTV", 4100.0, 680, 145000, 2.8, 1.4, 15200, 8610.0,
            )],
        ),
        marketer(
            "Le Van C",
            "lvc@example.com",
            Status::Inactive,
            vec![campaign(
                "C-005", "App Install Asia", 1200.0, 110, 35000, 0.9, 1.0, 2100, 960.0,
            )],
        ),
        marketer(
            "Pham Minh D",
            "pmd@example.com",
            Status::Active,
            vec![
                campaign(
                    "C-006", "Black Friday Teaser", 9500.0, 2100, 520000, 4.1, 2.5, 88000, 36100.0,
                ),
                campaign(
                    "C-007", "Flash Sale Local", 1500.0, 450, 85000, 3.8, 1.8, 4500, 5700.0,
                ),
            ],
        ),
    ]
}

/// Wipes the store and loads the demo marketers.
#[tracing::instrument(skip(db))]
pub async fn seed(db: &dyn Database) -> Result<(), Error> {
    db.drop().await?;

    for marketer in demo_marketers() {
        db.marketers().insert_marketer(marketer).await?;
    }

    Ok(())
}
