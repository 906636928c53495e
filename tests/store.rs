use anyhow::Result;
use musaeum::{ArtifactRecord, SizeTriple};

mod util;

fn vase() -> ArtifactRecord {
    let mut record = ArtifactRecord::new("Ming Vase", "Blue-and-white porcelain vase.");
    record.images = vec!["vase_front.jpg".into(), "vase_back.jpg".into()];
    record.references = vec!["Carswell 2000, p. 12".into()];
    record.location = Some("Hall 3, Case 7".into());
    record.size = SizeTriple {
        length: Some("12".into()),
        width: Some("12".into()),
        height: Some("34.5".into()),
    };
    record.tags = vec!["porcelain".into(), "ming".into()];
    record
}

#[tokio::test]
async fn create_then_list_categories() -> Result<()> {
    let session = util::memory_session().await;

    session.create_category("ceramics").await?;
    session.create_category("Coins_2024").await?;
    session.create_category("armour").await?;

    // sqlite_master listing is lexicographic, uppercase before lowercase.
    let names = session.list_categories().await?;
    assert_eq!(names, vec!["Coins_2024", "armour", "ceramics"]);

    session.close().await;
    Ok(())
}

#[tokio::test]
async fn duplicate_category_is_rejected() -> Result<()> {
    let session = util::memory_session().await;

    session.create_category("ceramics").await?;
    let err = session
        .create_category("ceramics")
        .await
        .expect_err("second create must fail");
    assert_eq!(err.code(), "CATEGORY/DUPLICATE");

    session.close().await;
    Ok(())
}

#[tokio::test]
async fn hostile_category_names_never_reach_sql() -> Result<()> {
    let session = util::memory_session().await;

    for name in ["items; DROP TABLE x", "a b", "1st", "", "sqlite_master"] {
        let err = session
            .create_category(name)
            .await
            .expect_err("allow-list must reject");
        assert_eq!(err.code(), "CATEGORY/INVALID_NAME");
    }
    assert!(session.list_categories().await?.is_empty());

    session.close().await;
    Ok(())
}

#[tokio::test]
async fn save_and_find_round_trips_the_record() -> Result<()> {
    let session = util::memory_session().await;
    session.create_category("ceramics").await?;

    let record = vase();
    session.save("ceramics", &record).await?;

    let (found, category) = session
        .find_by_title(Some("ceramics"), "Ming Vase")
        .await?
        .expect("saved record retrievable");
    assert_eq!(category, "ceramics");
    assert_eq!(found, record);

    session.close().await;
    Ok(())
}

#[tokio::test]
async fn save_truncates_overflowing_sequences() -> Result<()> {
    let session = util::memory_session().await;
    session.create_category("ceramics").await?;

    let mut record = vase();
    record.images = (0..7).map(|i| format!("img_{i}.jpg")).collect();
    session.save("ceramics", &record).await?;

    let (found, _) = session
        .find_by_title(Some("ceramics"), "Ming Vase")
        .await?
        .expect("record retrievable");
    assert_eq!(found.images.len(), 5);
    assert_eq!(found.images[0], "img_0.jpg");
    assert_eq!(found.images[4], "img_4.jpg");

    session.close().await;
    Ok(())
}

#[tokio::test]
async fn save_twice_last_write_wins() -> Result<()> {
    let session = util::memory_session().await;
    session.create_category("ceramics").await?;

    session.save("ceramics", &vase()).await?;
    let mut updated = vase();
    updated.description = "Restored in 2019.".into();
    updated.tags.clear();
    session.save("ceramics", &updated).await?;

    assert_eq!(session.list_titles("ceramics").await?, vec!["Ming Vase"]);
    let (found, _) = session
        .find_by_title(Some("ceramics"), "Ming Vase")
        .await?
        .expect("record retrievable");
    assert_eq!(found.description, "Restored in 2019.");
    assert!(found.tags.is_empty());

    session.close().await;
    Ok(())
}

#[tokio::test]
async fn untargeted_find_scans_categories_in_order() -> Result<()> {
    let session = util::memory_session().await;
    session.create_category("armour").await?;
    session.create_category("ceramics").await?;

    let mut in_ceramics = vase();
    in_ceramics.location = Some("Ceramics wing".into());
    session.save("ceramics", &in_ceramics).await?;

    let mut in_armour = vase();
    in_armour.location = Some("Armoury".into());
    session.save("armour", &in_armour).await?;

    // Same title in both; "armour" sorts first, so it wins.
    let (found, category) = session
        .find_by_title(None, "Ming Vase")
        .await?
        .expect("title present somewhere");
    assert_eq!(category, "armour");
    assert_eq!(found.location.as_deref(), Some("Armoury"));

    assert!(session.find_by_title(None, "No Such Title").await?.is_none());

    session.close().await;
    Ok(())
}

#[tokio::test]
async fn find_in_missing_category_is_an_error() -> Result<()> {
    let session = util::memory_session().await;

    let err = session
        .find_by_title(Some("ceramics"), "Ming Vase")
        .await
        .expect_err("missing category must error");
    assert_eq!(err.code(), "CATEGORY/NOT_FOUND");

    session.close().await;
    Ok(())
}

#[tokio::test]
async fn delete_reports_whether_a_row_existed() -> Result<()> {
    let session = util::memory_session().await;
    session.create_category("ceramics").await?;
    session.save("ceramics", &vase()).await?;

    assert!(session.delete("ceramics", "Ming Vase").await?);
    // Second delete is a no-op, not an error.
    assert!(!session.delete("ceramics", "Ming Vase").await?);
    assert!(session.list_titles("ceramics").await?.is_empty());

    session.close().await;
    Ok(())
}

#[tokio::test]
async fn blank_slots_come_back_empty_not_padded() -> Result<()> {
    let session = util::memory_session().await;
    session.create_category("ceramics").await?;

    let minimal = ArtifactRecord::new("Shard", "A single shard.");
    session.save("ceramics", &minimal).await?;

    let (found, _) = session
        .find_by_title(Some("ceramics"), "Shard")
        .await?
        .expect("record retrievable");
    assert!(found.images.is_empty());
    assert!(found.references.is_empty());
    assert!(found.tags.is_empty());
    assert!(found.location.is_none());
    assert!(found.size.is_empty());

    session.close().await;
    Ok(())
}
