//! Shared test fixtures: seeded in-memory backend and template config.

#![allow(dead_code)]

use fpt_backend::{AssetRecord, InMemoryDatabase, TemplateSet};
use fpt_manager::FptManager;
use serde_json::json;
use std::sync::Arc;

pub const TEMPLATES_TOML: &str = r#"
[[template]]
name = "maya_shot_work"
definition = "/mnt/proj/sequences/{Sequence}/{Shot}/work/scene.v{version}.ma"
keys = [
    { name = "Sequence" },
    { name = "Shot" },
    { name = "version", kind = "int", padding = 3 },
]
"#;

/// A database pre-seeded with the records the scenario tests expect.
pub fn seeded_database() -> InMemoryDatabase {
    let mut db = InMemoryDatabase::new();

    // A published file with a locally-resolvable path.
    db.insert(
        "PublishedFile",
        123,
        AssetRecord::from([
            ("name", json!("shotA_v001")),
            ("path", json!({ "local_path": "/mnt/proj/a.ma" })),
        ]),
    );

    // A published file whose path attachment has a URL but no local path.
    db.insert(
        "PublishedFile",
        201,
        AssetRecord::from([(
            "path",
            json!({ "url": "sg://attachments/201" }),
        )]),
    );

    // A published file whose path attachment carries nothing usable.
    db.insert(
        "PublishedFile",
        202,
        AssetRecord::from([("path", json!({}))]),
    );

    // A version resolvable through its rendered outputs and shot range.
    db.insert(
        "Version",
        300,
        AssetRecord::from([
            ("sg_path_to_frames", json!("/mnt/proj/renders/shotA.1001.exr")),
            ("sg_path_to_movie", json!("/mnt/proj/renders/shotA.mov")),
            ("entity.Shot.sg_head_in", json!(1001)),
            ("entity.Shot.sg_cut_out", json!(1096)),
        ]),
    );

    // A version only available as an uploaded movie.
    db.insert(
        "Version",
        301,
        AssetRecord::from([(
            "sg_uploaded_movie",
            json!({ "url": "https://studio.example.com/movie/301" }),
        )]),
    );

    db
}

pub fn manager_with(db: Arc<InMemoryDatabase>) -> FptManager {
    let templates = TemplateSet::from_toml_str(TEMPLATES_TOML).unwrap();
    FptManager::with_backends(db, Box::new(templates))
}
