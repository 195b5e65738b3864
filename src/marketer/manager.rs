use std::collections::HashSet;

use crate::campaign::{Campaign, CampaignId};
use crate::database::Database;
use crate::error::Error;

use super::{Marketer, MarketerId, MarketerPatch, NewMarketer};

#[tracing::instrument(skip(db))]
pub async fn get_marketers(
    db: &dyn Database,
    search: Option<&str>,
) -> Result<Vec<Marketer>, Error> {
    let mut marketers = db.marketers().fetch_marketers().await?;

    if let Some(term) = search {
        marketers.retain(|marketer| marketer.matches(term));
    }

    Ok(marketers)
}

#[tracing::instrument(skip(db))]
pub async fn get_marketer_by_id(
    db: &dyn Database,
    marketer_id: &MarketerId,
) -> Result<Marketer, Error> {
    let marketer = db
        .marketers()
        .fetch_marketer_by_id(marketer_id)
        .await?
        .ok_or_else(|| Error::MarketerNotFound {
            marketer_id: marketer_id.clone(),
        })?;

    Ok(marketer)
}

#[tracing::instrument(skip(db))]
pub async fn create_marketer(db: &dyn Database, marketer: NewMarketer) -> Result<Marketer, Error> {
    let mut marketer = NewMarketer {
        name: required("name", &marketer.name)?,
        email: required("email", &marketer.email)?,
        ..marketer
    };
    assign_campaign_ids(&mut marketer.campaigns);
    ensure_unique_campaign_ids(None, &marketer.campaigns)?;

    db.marketers().insert_marketer(marketer).await
}

/// Writes the patch and returns the marketer as it now should look. The
/// result is merged locally rather than read back from the store.
#[tracing::instrument(skip(db))]
pub async fn update_marketer(
    db: &dyn Database,
    marketer_id: &MarketerId,
    patch: MarketerPatch,
) -> Result<Marketer, Error> {
    let mut patch = MarketerPatch {
        name: patch.name.as_deref().map(|name| required("name", name)).transpose()?,
        email: patch
            .email
            .as_deref()
            .map(|email| required("email", email))
            .transpose()?,
        ..patch
    };
    if let Some(campaigns) = &mut patch.campaigns {
        assign_campaign_ids(campaigns);
        ensure_unique_campaign_ids(Some(marketer_id), campaigns)?;
    }

    let mut marketer = get_marketer_by_id(db, marketer_id).await?;
    db.marketers().update_marketer(marketer_id, &patch).await?;
    marketer.apply(&patch);

    Ok(marketer)
}

#[tracing::instrument(skip(db))]
pub async fn delete_marketer(db: &dyn Database, marketer_id: &MarketerId) -> Result<(), Error> {
    db.marketers().delete_marketer(marketer_id).await
}

fn required(field: &'static str, value: &str) -> Result<String, Error> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::MarketerFieldRequired { field });
    }

    Ok(value.to_owned())
}

/// Gives every campaign submitted without an id a fresh one.
pub(crate) fn assign_campaign_ids(campaigns: &mut [Campaign]) {
    for campaign in campaigns.iter_mut().filter(|c| c.id.is_blank()) {
        campaign.id = CampaignId::new();
    }
}

pub(crate) fn ensure_unique_campaign_ids(
    marketer_id: Option<&MarketerId>,
    campaigns: &[Campaign],
) -> Result<(), Error> {
    let mut seen = HashSet::new();
    for campaign in campaigns {
        if !seen.insert(&campaign.id) {
            return Err(Error::DuplicateCampaignId {
                marketer_id: marketer_id.cloned(),
                campaign_id: campaign.id.clone(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::database::test::MockDatabase;
    use crate::marketer::Status;

    fn marketer(id: &MarketerId, name: &str, email: &str) -> Marketer {
        Marketer {
            id: id.clone(),
            name: name.into(),
            email: email.into(),
            status: Status::Active,
            campaigns: vec![],
        }
    }

    fn campaign(id: &str) -> Campaign {
        Campaign {
            id: id.parse().unwrap(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn can_create_marketer() {
        let mut db = MockDatabase::new();
        let called_insert = Arc::new(Mutex::new(false));
        let called_insert_clone = Arc::clone(&called_insert);
        db.marketers.on_insert_marketer = Box::new(move |new| {
            *called_insert_clone.lock().unwrap() = true;
            assert_eq!(new.name, "Nguyen Van A");
            assert_eq!(new.email, "nva@example.com");
            Ok(Marketer::from_new(MarketerId::new(), new))
        });

        let marketer = create_marketer(
            &db,
            NewMarketer {
                name: "  Nguyen Van A ".into(),
                email: "nva@example.com".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(marketer.name, "Nguyen Van A");
        assert_eq!(marketer.status, Status::Active);
        assert!(
            *called_insert.lock().unwrap(),
            "db.insert_marketer was not called"
        );
    }

    #[tokio::test]
    async fn create_marketer_assigns_missing_campaign_ids() {
        let mut db = MockDatabase::new();
        db.marketers.on_insert_marketer = Box::new(|new| {
            assert!(new.campaigns.iter().all(|c| !c.id.is_blank()));
            Ok(Marketer::from_new(MarketerId::new(), new))
        });
        let unnamed = Campaign {
            id: CampaignId::blank(),
            ..Default::default()
        };

        let marketer = create_marketer(
            &db,
            NewMarketer {
                name: "Hoang To E".into(),
                email: "hte@example.com".into(),
                campaigns: vec![unnamed.clone(), unnamed, campaign("C-004")],
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let ids: Vec<&CampaignId> = marketer.campaigns.iter().map(|c| &c.id).collect();
        assert!(ids[0].as_str().starts_with("CMP-"));
        assert_ne!(ids[0], ids[1]);
        assert_eq!(ids[2].as_str(), "C-004");
    }

    #[tokio::test]
    async fn update_marketer_assigns_missing_campaign_ids() {
        let mut db = MockDatabase::new();
        let test_marketer_id = MarketerId::new();
        let stored = marketer(&test_marketer_id, "Le Van C", "lvc@example.com");
        db.marketers.on_fetch_marketer_by_id = Box::new(move |_| Ok(Some(stored.clone())));
        db.marketers.on_update_marketer = Box::new(|(_, patch)| {
            let campaigns = patch.campaigns.unwrap_or_default();
            assert!(campaigns.iter().all(|c| !c.id.is_blank()));
            Ok(())
        });

        let marketer = update_marketer(
            &db,
            &test_marketer_id,
            MarketerPatch {
                campaigns: Some(vec![Campaign {
                    id: CampaignId::blank(),
                    ..Default::default()
                }]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert!(!marketer.campaigns[0].id.is_blank());
    }

    #[tokio::test]
    async fn create_marketer_requires_name_and_email() {
        let db = MockDatabase::new();

        let result = create_marketer(
            &db,
            NewMarketer {
                name: "   ".into(),
                email: "nva@example.com".into(),
                ..Default::default()
            },
        )
        .await;
        assert_eq!(
            result.unwrap_err(),
            Error::MarketerFieldRequired { field: "name" }
        );

        let result = create_marketer(
            &db,
            NewMarketer {
                name: "Nguyen Van A".into(),
                email: "".into(),
                ..Default::default()
            },
        )
        .await;
        assert_eq!(
            result.unwrap_err(),
            Error::MarketerFieldRequired { field: "email" }
        );
    }

    #[tokio::test]
    async fn create_marketer_rejects_duplicate_campaign_ids() {
        let db = MockDatabase::new();

        let result = create_marketer(
            &db,
            NewMarketer {
                name: "Pham Minh D".into(),
                email: "pmd@example.com".into(),
                campaigns: vec![campaign("C-006"), campaign("C-007"), campaign("C-006")],
                ..Default::default()
            },
        )
        .await;

        assert_eq!(
            result.unwrap_err(),
            Error::DuplicateCampaignId {
                marketer_id: None,
                campaign_id: "C-006".parse().unwrap(),
            }
        );
    }

    #[tokio::test]
    async fn get_marketers_filters_by_search_term() {
        let mut db = MockDatabase::new();
        db.marketers.on_fetch_marketers = Box::new(|_| {
            Ok(vec![
                marketer(&MarketerId::new(), "Nguyen Van A", "nva@example.com"),
                marketer(&MarketerId::new(), "Tran Thi B", "ttb@example.com"),
            ])
        });

        let all = get_marketers(&db, None).await.unwrap();
        let found = get_marketers(&db, Some("TTB")).await.unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Tran Thi B");
    }

    #[tokio::test]
    async fn get_marketer_by_id_returns_error_if_doesnt_exist() {
        let mut db = MockDatabase::new();
        let test_marketer_id = MarketerId::new();
        let expected_id = test_marketer_id.clone();
        db.marketers.on_fetch_marketer_by_id = Box::new(move |marketer_id| {
            assert_eq!(marketer_id, expected_id);
            Ok(None)
        });

        let result = get_marketer_by_id(&db, &test_marketer_id).await;

        assert_eq!(
            result.unwrap_err(),
            Error::MarketerNotFound {
                marketer_id: test_marketer_id
            }
        );
    }

    #[tokio::test]
    async fn update_marketer_merges_patch_locally() {
        let mut db = MockDatabase::new();
        let test_marketer_id = MarketerId::new();
        let stored = marketer(&test_marketer_id, "Le Van C", "lvc@example.com");
        db.marketers.on_fetch_marketer_by_id = Box::new(move |_| Ok(Some(stored.clone())));
        let called_update = Arc::new(Mutex::new(false));
        let called_update_clone = Arc::clone(&called_update);
        db.marketers.on_update_marketer = Box::new(move |(_, patch)| {
            *called_update_clone.lock().unwrap() = true;
            assert_eq!(patch.status, Some(Status::Inactive));
            assert_eq!(patch.name, None);
            Ok(())
        });

        let marketer = update_marketer(
            &db,
            &test_marketer_id,
            MarketerPatch {
                status: Some(Status::Inactive),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(marketer.name, "Le Van C");
        assert_eq!(marketer.status, Status::Inactive);
        assert!(
            *called_update.lock().unwrap(),
            "db.update_marketer was not called"
        );
    }

    #[tokio::test]
    async fn update_marketer_rejects_blank_email() {
        let db = MockDatabase::new();

        let result = update_marketer(
            &db,
            &MarketerId::new(),
            MarketerPatch {
                email: Some(" ".into()),
                ..Default::default()
            },
        )
        .await;

        assert_eq!(
            result.unwrap_err(),
            Error::MarketerFieldRequired { field: "email" }
        );
    }

    #[tokio::test]
    async fn update_marketer_of_unknown_id_does_not_write() {
        let mut db = MockDatabase::new();
        db.marketers.on_fetch_marketer_by_id = Box::new(|_| Ok(None));
        let marketer_id = MarketerId::new();

        let result = update_marketer(
            &db,
            &marketer_id,
            MarketerPatch {
                name: Some("Hoang To E".into()),
                ..Default::default()
            },
        )
        .await;

        assert_eq!(result.unwrap_err(), Error::MarketerNotFound { marketer_id });
    }

    #[tokio::test]
    async fn delete_marketer_forwards_to_store() {
        let mut db = MockDatabase::new();
        let test_marketer_id = MarketerId::new();
        let expected_id = test_marketer_id.clone();
        db.marketers.on_delete_marketer = Box::new(move |marketer_id| {
            assert_eq!(marketer_id, expected_id);
            Ok(())
        });

        delete_marketer(&db, &test_marketer_id).await.unwrap();
    }
}
