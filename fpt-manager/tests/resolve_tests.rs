//! Resolution scenarios against a seeded in-memory backend.

mod common;

use common::{manager_with, seeded_database};
use fpt_types::{
    trait_ids, trait_properties, trait_set, Access, BatchElementError, EntityReference, ErrorCode,
    PropertyValue, TraitsData,
};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::sync::Arc;

/// Drives a resolve batch and collects per-index outcomes.
fn run_resolve(
    manager: &fpt_manager::FptManager,
    refs: &[EntityReference],
    traits: &fpt_types::TraitSet,
    access: Access,
) -> Vec<(usize, Result<TraitsData, BatchElementError>)> {
    let outcomes = RefCell::new(Vec::new());
    manager
        .resolve(
            refs,
            traits,
            access,
            |idx, data| outcomes.borrow_mut().push((idx, Ok(data))),
            |idx, err| outcomes.borrow_mut().push((idx, Err(err))),
        )
        .unwrap();
    outcomes.into_inner()
}

#[test]
fn asset_resolves_location_and_display_name() {
    let db = Arc::new(seeded_database());
    let manager = manager_with(db);

    let refs = vec![EntityReference::new("fpt://asset/PublishedFile/123")];
    let traits = trait_set(&[trait_ids::LOCATABLE_CONTENT, trait_ids::DISPLAY_NAME]);

    let outcomes = run_resolve(&manager, &refs, &traits, Access::Read);
    let (idx, result) = &outcomes[0];
    assert_eq!(*idx, 0);

    let data = result.as_ref().unwrap();
    assert_eq!(
        data.property(trait_ids::LOCATABLE_CONTENT, trait_properties::LOCATION)
            .and_then(PropertyValue::as_str),
        Some("file:///mnt/proj/a.ma")
    );
    assert_eq!(
        data.property(trait_ids::DISPLAY_NAME, trait_properties::NAME)
            .and_then(PropertyValue::as_str),
        Some("shotA_v001")
    );
}

#[test]
fn missing_record_reports_not_found_with_reference_string() {
    let db = Arc::new(seeded_database());
    let manager = manager_with(db);

    let refs = vec![EntityReference::new("fpt://asset/PublishedFile/999")];
    let traits = trait_set(&[trait_ids::LOCATABLE_CONTENT]);

    let outcomes = run_resolve(&manager, &refs, &traits, Access::Read);
    let err = outcomes[0].1.as_ref().unwrap_err();
    assert_eq!(err.code, ErrorCode::ResolutionError);
    assert!(err.message.contains("fpt://asset/PublishedFile/999"));
}

#[test]
fn extra_segment_is_malformed() {
    let db = Arc::new(seeded_database());
    let manager = manager_with(db);

    let refs = vec![EntityReference::new("fpt://asset/PublishedFile/123/extra")];
    let traits = trait_set(&[trait_ids::LOCATABLE_CONTENT]);

    let outcomes = run_resolve(&manager, &refs, &traits, Access::Read);
    let err = outcomes[0].1.as_ref().unwrap_err();
    assert_eq!(err.code, ErrorCode::MalformedReference);
    assert!(err.message.contains("fpt://asset/PublishedFile/123/extra"));
}

#[test]
fn path_url_used_when_local_path_absent() {
    let db = Arc::new(seeded_database());
    let manager = manager_with(db);

    let refs = vec![EntityReference::new("fpt://asset/PublishedFile/201")];
    let traits = trait_set(&[trait_ids::LOCATABLE_CONTENT]);

    let outcomes = run_resolve(&manager, &refs, &traits, Access::Read);
    let data = outcomes[0].1.as_ref().unwrap();
    // Attachment URL is used verbatim, not converted.
    assert_eq!(
        data.property(trait_ids::LOCATABLE_CONTENT, trait_properties::LOCATION)
            .and_then(PropertyValue::as_str),
        Some("sg://attachments/201")
    );
}

#[test]
fn unresolvable_path_attachment_imbues_location_bare() {
    let db = Arc::new(seeded_database());
    let manager = manager_with(db);

    let refs = vec![EntityReference::new("fpt://asset/PublishedFile/202")];
    let traits = trait_set(&[trait_ids::LOCATABLE_CONTENT]);

    let outcomes = run_resolve(&manager, &refs, &traits, Access::Read);
    let data = outcomes[0].1.as_ref().unwrap();
    // The trait is present — the entity has a location concept — but no
    // location property could be supplied for this system.
    assert!(data.has_trait(trait_ids::LOCATABLE_CONTENT));
    assert!(data
        .property(trait_ids::LOCATABLE_CONTENT, trait_properties::LOCATION)
        .is_none());
}

#[test]
fn rendered_frames_take_priority_over_movie() {
    let db = Arc::new(seeded_database());
    let manager = manager_with(db);

    let refs = vec![EntityReference::new("fpt://asset/Version/300")];
    let traits = trait_set(&[trait_ids::LOCATABLE_CONTENT, trait_ids::FRAME_RANGED]);

    let outcomes = run_resolve(&manager, &refs, &traits, Access::Read);
    let data = outcomes[0].1.as_ref().unwrap();
    assert_eq!(
        data.property(trait_ids::LOCATABLE_CONTENT, trait_properties::LOCATION)
            .and_then(PropertyValue::as_str),
        Some("file:///mnt/proj/renders/shotA.1001.exr")
    );
    // Shot range fields are each independently optional.
    assert_eq!(
        data.property(trait_ids::FRAME_RANGED, trait_properties::START_FRAME)
            .and_then(PropertyValue::as_int),
        Some(1001)
    );
    assert_eq!(
        data.property(trait_ids::FRAME_RANGED, trait_properties::OUT_FRAME)
            .and_then(PropertyValue::as_int),
        Some(1096)
    );
    assert!(data
        .property(trait_ids::FRAME_RANGED, trait_properties::END_FRAME)
        .is_none());
}

#[test]
fn uploaded_movie_url_is_last_resort() {
    let db = Arc::new(seeded_database());
    let manager = manager_with(db);

    let refs = vec![EntityReference::new("fpt://asset/Version/301")];
    let traits = trait_set(&[trait_ids::LOCATABLE_CONTENT]);

    let outcomes = run_resolve(&manager, &refs, &traits, Access::Read);
    let data = outcomes[0].1.as_ref().unwrap();
    assert_eq!(
        data.property(trait_ids::LOCATABLE_CONTENT, trait_properties::LOCATION)
            .and_then(PropertyValue::as_str),
        Some("https://studio.example.com/movie/301")
    );
}

#[test]
fn workfile_resolves_to_expanded_template_url() {
    let db = Arc::new(seeded_database());
    let manager = manager_with(db);

    let refs = vec![EntityReference::new(
        "fpt://workfile/maya_shot_work/seq010/shot020/3",
    )];
    let traits = trait_set(&[trait_ids::LOCATABLE_CONTENT]);

    let outcomes = run_resolve(&manager, &refs, &traits, Access::Read);
    let data = outcomes[0].1.as_ref().unwrap();
    assert_eq!(
        data.property(trait_ids::LOCATABLE_CONTENT, trait_properties::LOCATION)
            .and_then(PropertyValue::as_str),
        Some("file:///mnt/proj/sequences/seq010/shot020/work/scene.v003.ma")
    );
}

#[test]
fn workfile_ignores_traits_it_cannot_populate() {
    let db = Arc::new(seeded_database());
    let manager = manager_with(Arc::clone(&db));

    let refs = vec![EntityReference::new(
        "fpt://workfile/maya_shot_work/seq010/shot020/3",
    )];
    let traits = trait_set(&[
        trait_ids::LOCATABLE_CONTENT,
        trait_ids::DISPLAY_NAME,
        trait_ids::FRAME_RANGED,
    ]);

    let outcomes = run_resolve(&manager, &refs, &traits, Access::Read);
    let data = outcomes[0].1.as_ref().unwrap();
    // Only location; the unsupported traits are silently absent, no error.
    assert!(data.has_trait(trait_ids::LOCATABLE_CONTENT));
    assert!(!data.has_trait(trait_ids::DISPLAY_NAME));
    assert!(!data.has_trait(trait_ids::FRAME_RANGED));
    // And no backend query was made for the workfile.
    assert_eq!(db.query_count(), 0);
}

#[test]
fn batch_preserves_order_and_invokes_exactly_one_callback_per_item() {
    let db = Arc::new(seeded_database());
    let manager = manager_with(db);

    let refs = vec![
        EntityReference::new("fpt://asset/PublishedFile/123"), // ok
        EntityReference::new("not-a-reference"),               // malformed
        EntityReference::new("fpt://asset/PublishedFile/999"), // not found
        EntityReference::new("fpt://workfile/maya_shot_work/seq010/shot020/3"), // ok
    ];
    let traits = trait_set(&[trait_ids::LOCATABLE_CONTENT]);

    let outcomes = run_resolve(&manager, &refs, &traits, Access::Read);
    assert_eq!(outcomes.len(), refs.len());
    let indices: Vec<usize> = outcomes.iter().map(|(idx, _)| *idx).collect();
    assert_eq!(indices, vec![0, 1, 2, 3]);

    assert!(outcomes[0].1.is_ok());
    assert_eq!(
        outcomes[1].1.as_ref().unwrap_err().code,
        ErrorCode::MalformedReference
    );
    assert_eq!(
        outcomes[2].1.as_ref().unwrap_err().code,
        ErrorCode::ResolutionError
    );
    assert!(outcomes[3].1.is_ok());
}

#[test]
fn non_read_access_errors_every_item_without_backend_calls() {
    let db = Arc::new(seeded_database());
    let manager = manager_with(Arc::clone(&db));

    let refs = vec![
        EntityReference::new("fpt://asset/PublishedFile/123"),
        EntityReference::new("fpt://asset/PublishedFile/999"),
        EntityReference::new("garbage"),
    ];
    let traits = trait_set(&[trait_ids::LOCATABLE_CONTENT]);

    let outcomes = run_resolve(&manager, &refs, &traits, Access::Write);
    assert_eq!(outcomes.len(), 3);
    for (_, result) in &outcomes {
        assert_eq!(result.as_ref().unwrap_err().code, ErrorCode::AccessError);
    }
    assert_eq!(db.query_count(), 0);
}
