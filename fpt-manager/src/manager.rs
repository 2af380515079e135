//! The manager interface implementation.

use crate::error::ManagerError;
use crate::reference::{parse_reference, ParsedReference};
use fpt_backend::{
    AssetDatabase, AssetRecord, FieldValue, HttpAssetDatabase, ManagerSettings, PathTemplate,
    TemplateEngine, TemplateSet,
};
use fpt_types::{
    trait_ids, trait_properties, Access, BatchElementError, EntityReference, ErrorCode, TraitSet,
    TraitsData, REFERENCE_PREFIX,
};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};
use url::Url;

/// Metadata key advertising that references can be recognised by a fixed
/// string prefix, letting hosts skip generic string-sniffing.
pub const INFO_KEY_REFERENCE_PREFIX: &str = "entityReferencesMatchPrefix";

/// Backend fields consulted for the locatable-content trait, covering the
/// different record shapes (published files carry a structured `path`,
/// versions carry `sg_path_to_*` / `sg_uploaded_movie`).
const LOCATION_FIELDS: [&str; 5] = [
    "path",
    "sg_path_to_movie",
    "sg_path_to_geometry",
    "sg_path_to_frames",
    "sg_uploaded_movie",
];

/// Shot-range fields behind the frame-range trait, each independently
/// optional on the record.
const FRAME_RANGE_FIELDS: [&str; 4] = [
    "entity.Shot.sg_cut_in",
    "entity.Shot.sg_cut_out",
    "entity.Shot.sg_head_in",
    "entity.Shot.sg_tail_out",
];

/// Capabilities a host may probe for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    EntityReferenceIdentification,
    ManagementPolicyQueries,
    Resolution,
    EntityTraitIntrospection,
    Publishing,
    Relationships,
}

/// The FPT asset-resolution manager.
///
/// Synchronous and single-threaded by contract: batch operations process
/// their items sequentially, each backend call blocking until it completes.
/// The database client and template engine are instance-lifetime singletons;
/// the template engine is constructed lazily on first use and is not guarded
/// against concurrent first access — callers needing concurrency must
/// serialize that themselves.
pub struct FptManager {
    settings: ManagerSettings,
    database: Option<Arc<dyn AssetDatabase>>,
    /// Two-state holder: uninitialized until the first workfile parse, then
    /// `Some` engine or `None` if construction failed/was unconfigured.
    templates: OnceLock<Option<Box<dyn TemplateEngine>>>,
}

impl FptManager {
    pub const IDENTIFIER: &'static str = "org.foundry.fpt";

    /// An unconfigured manager. Call [`initialize`](Self::initialize) before
    /// any batch operation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            settings: ManagerSettings::default(),
            database: None,
            templates: OnceLock::new(),
        }
    }

    /// A manager wired to explicit backends, bypassing initialization.
    /// Used by tests and offline tooling.
    #[must_use]
    pub fn with_backends(
        database: Arc<dyn AssetDatabase>,
        templates: Box<dyn TemplateEngine>,
    ) -> Self {
        let holder = OnceLock::new();
        let _ = holder.set(Some(templates));
        Self {
            settings: ManagerSettings::default(),
            database: Some(database),
            templates: holder,
        }
    }

    /// Connects to the FPT service using the given settings.
    ///
    /// The one fatal error path: without a live, authenticated connection no
    /// operation can proceed, so failure here surfaces as a hard error
    /// rather than per-item results.
    pub fn initialize(&mut self, settings: ManagerSettings) -> Result<(), ManagerError> {
        self.settings = settings;
        // Settings may name a different templates file; drop any engine
        // constructed from the previous ones.
        self.templates = OnceLock::new();

        let database = HttpAssetDatabase::connect(&self.settings)?;
        self.database = Some(Arc::new(database));
        info!(identifier = Self::IDENTIFIER, "manager initialized");
        Ok(())
    }

    // ================================================================
    // Identity and capabilities
    // ================================================================

    #[must_use]
    pub fn identifier(&self) -> &'static str {
        Self::IDENTIFIER
    }

    #[must_use]
    pub fn display_name(&self) -> &'static str {
        "Flow Production Tracking"
    }

    /// Arbitrary metadata about this manager.
    #[must_use]
    pub fn info(&self) -> BTreeMap<String, String> {
        BTreeMap::from([(
            INFO_KEY_REFERENCE_PREFIX.to_string(),
            REFERENCE_PREFIX.to_string(),
        )])
    }

    /// Advertises supported capabilities. Write/publish paths are
    /// deliberately absent.
    #[must_use]
    pub fn has_capability(&self, capability: Capability) -> bool {
        matches!(
            capability,
            Capability::EntityReferenceIdentification
                | Capability::ManagementPolicyQueries
                | Capability::Resolution
                | Capability::EntityTraitIntrospection
        )
    }

    /// Whether a string looks like one of our entity references.
    ///
    /// Hosts honouring [`INFO_KEY_REFERENCE_PREFIX`] will usually perform
    /// this check themselves.
    #[must_use]
    pub fn is_entity_reference_string(&self, some_string: &str) -> bool {
        some_string.starts_with(REFERENCE_PREFIX)
    }

    // ================================================================
    // Management policy
    // ================================================================

    /// The manager's policy for each requested trait set under the given
    /// access mode: which of those traits it manages and can populate.
    ///
    /// The rules are independent and additive; a trait set can trigger
    /// several. Display-name support is withheld when the work trait is
    /// requested alongside it, since workfiles are bare filesystem paths
    /// with no separate display name.
    #[must_use]
    pub fn management_policy(&self, trait_sets: &[TraitSet], access: Access) -> Vec<TraitsData> {
        // Read-only manager: anything else is unmanaged across the board.
        if !access.is_read() {
            return vec![TraitsData::new(); trait_sets.len()];
        }

        trait_sets
            .iter()
            .map(|trait_set| {
                let mut policy = TraitsData::new();

                if trait_set.contains(trait_ids::LOCATABLE_CONTENT) {
                    policy.imbue(trait_ids::MANAGED);
                    policy.imbue(trait_ids::LOCATABLE_CONTENT);
                }

                if !trait_set.contains(trait_ids::WORK)
                    && trait_set.contains(trait_ids::DISPLAY_NAME)
                {
                    policy.imbue(trait_ids::MANAGED);
                    policy.imbue(trait_ids::DISPLAY_NAME);
                }

                if trait_set.contains(trait_ids::FRAME_RANGED) {
                    policy.imbue(trait_ids::MANAGED);
                    policy.imbue(trait_ids::FRAME_RANGED);
                }

                policy
            })
            .collect()
    }

    // ================================================================
    // Trait introspection
    // ================================================================

    /// Queries the traits associated with each referenced entity.
    ///
    /// Exactly one of `on_success`/`on_error` is invoked per input index.
    /// Database references are checked for existence; workfile references
    /// are not — for those the entity *is* the path, and whether it exists
    /// on disk is a separate concern.
    pub fn entity_traits(
        &self,
        references: &[EntityReference],
        access: Access,
        mut on_success: impl FnMut(usize, TraitSet),
        mut on_error: impl FnMut(usize, BatchElementError),
    ) -> Result<(), ManagerError> {
        if !access.is_read() {
            let error = read_only_error();
            for idx in 0..references.len() {
                on_error(idx, error.clone());
            }
            return Ok(());
        }

        let database = self.database()?;

        for (idx, reference) in references.iter().enumerate() {
            match parse_reference(reference.as_str(), self.templates()) {
                None => on_error(idx, malformed_error(reference.as_str())),

                Some(ParsedReference::Asset {
                    ref_str,
                    entity_type,
                    id,
                }) => match database.find_one(&entity_type, id, &["id"]) {
                    Ok(Some(_)) => on_success(
                        idx,
                        fpt_types::trait_set(&[
                            trait_ids::ENTITY,
                            trait_ids::LOCATABLE_CONTENT,
                            trait_ids::DISPLAY_NAME,
                        ]),
                    ),
                    Ok(None) => on_error(idx, not_found_error(&ref_str)),
                    Err(e) => on_error(idx, backend_error(&ref_str, &e)),
                },

                Some(ParsedReference::Workfile { .. }) => on_success(
                    idx,
                    fpt_types::trait_set(&[trait_ids::ENTITY, trait_ids::LOCATABLE_CONTENT]),
                ),
            }
        }
        Ok(())
    }

    // ================================================================
    // Resolution
    // ================================================================

    /// Resolves each reference to the properties of the requested traits.
    ///
    /// Exactly one of `on_success`/`on_error` is invoked per input index. A
    /// success payload carries at most the properties the backend had data
    /// for; traits the backend knows nothing about are simply absent, never
    /// an error. No backend call is ever retried.
    pub fn resolve(
        &self,
        references: &[EntityReference],
        trait_set: &TraitSet,
        access: Access,
        mut on_success: impl FnMut(usize, TraitsData),
        mut on_error: impl FnMut(usize, BatchElementError),
    ) -> Result<(), ManagerError> {
        if !access.is_read() {
            let error = read_only_error();
            for idx in 0..references.len() {
                on_error(idx, error.clone());
            }
            return Ok(());
        }

        let database = self.database()?;

        // Shared projection: the backend field list depends only on the
        // requested traits, so compute it once for the whole batch.
        let fields = fields_for_trait_set(trait_set);
        debug!(?fields, count = references.len(), "resolving references");

        for (idx, reference) in references.iter().enumerate() {
            match parse_reference(reference.as_str(), self.templates()) {
                None => on_error(idx, malformed_error(reference.as_str())),

                Some(ParsedReference::Asset {
                    ref_str,
                    entity_type,
                    id,
                }) => match resolve_asset(database, &ref_str, &entity_type, id, &fields) {
                    Ok(data) => on_success(idx, data),
                    Err(e) => on_error(idx, e),
                },

                Some(ParsedReference::Workfile {
                    ref_str,
                    template,
                    fields: template_fields,
                }) => match resolve_workfile(&ref_str, &template, &template_fields, trait_set) {
                    Ok(data) => on_success(idx, data),
                    Err(e) => on_error(idx, e),
                },
            }
        }
        Ok(())
    }

    // ================================================================
    // Backends
    // ================================================================

    fn database(&self) -> Result<&dyn AssetDatabase, ManagerError> {
        self.database
            .as_deref()
            .ok_or(ManagerError::NotInitialized)
    }

    /// The template engine, constructed from settings on first use.
    ///
    /// Deferred because template configuration may not be available (or
    /// final) at construction time. First access from multiple threads is
    /// not guarded; the host integration convention is a single controlling
    /// thread.
    fn templates(&self) -> Option<&dyn TemplateEngine> {
        self.templates
            .get_or_init(|| {
                let path = self.settings.templates_file.as_ref()?;
                match TemplateSet::load_from(path) {
                    Ok(set) => Some(Box::new(set) as Box<dyn TemplateEngine>),
                    Err(e) => {
                        warn!("template engine unavailable: {e}");
                        None
                    }
                }
            })
            .as_deref()
    }
}

impl Default for FptManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Backend query fields implied by a requested trait set.
fn fields_for_trait_set(trait_set: &TraitSet) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if trait_set.contains(trait_ids::LOCATABLE_CONTENT) {
        fields.extend(LOCATION_FIELDS);
    }
    if trait_set.contains(trait_ids::DISPLAY_NAME) {
        fields.push("name");
    }
    if trait_set.contains(trait_ids::FRAME_RANGED) {
        fields.extend(FRAME_RANGE_FIELDS);
    }
    fields
}

/// Queries the backend for one record and assembles the trait property bag.
fn resolve_asset(
    database: &dyn AssetDatabase,
    ref_str: &str,
    entity_type: &str,
    id: i64,
    fields: &[&str],
) -> Result<TraitsData, BatchElementError> {
    let record = database
        .find_one(entity_type, id, fields)
        .map_err(|e| backend_error(ref_str, &e))?
        .ok_or_else(|| not_found_error(ref_str))?;

    let mut data = TraitsData::new();
    imbue_location(&mut data, &record);

    if let Some(name) = record.get_str("name") {
        data.set_property(trait_ids::DISPLAY_NAME, trait_properties::NAME, name);
    }

    for (field, property) in [
        ("entity.Shot.sg_head_in", trait_properties::START_FRAME),
        ("entity.Shot.sg_tail_out", trait_properties::END_FRAME),
        ("entity.Shot.sg_cut_in", trait_properties::IN_FRAME),
        ("entity.Shot.sg_cut_out", trait_properties::OUT_FRAME),
    ] {
        if let Some(frame) = record.get_i64(field) {
            data.set_property(trait_ids::FRAME_RANGED, property, frame);
        }
    }

    Ok(data)
}

/// Location sources tried in priority order: structured `path` attachment,
/// rendered-output paths, uploaded-movie URL.
fn imbue_location(data: &mut TraitsData, record: &AssetRecord) {
    if let Some(paths) = record.get_object("path") {
        let local_path = paths
            .get("local_path")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty());
        let path_url = paths
            .get("url")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty());

        if let Some(url) = local_path.and_then(|p| path_to_file_url(Path::new(p))) {
            // The attachment's own url field is not reliably encoded, so
            // prefer converting the local path ourselves.
            data.set_property(trait_ids::LOCATABLE_CONTENT, trait_properties::LOCATION, url);
        } else if let Some(url) = path_url {
            data.set_property(trait_ids::LOCATABLE_CONTENT, trait_properties::LOCATION, url);
        } else {
            // The record has a location concept, but not one resolvable on
            // this system. Imbue the trait bare so hosts can detect that.
            data.imbue(trait_ids::LOCATABLE_CONTENT);
        }
    } else if let Some(path) = record
        .get_str("sg_path_to_frames")
        .or_else(|| record.get_str("sg_path_to_geometry"))
        .or_else(|| record.get_str("sg_path_to_movie"))
    {
        if let Some(url) = path_to_file_url(Path::new(path)) {
            data.set_property(trait_ids::LOCATABLE_CONTENT, trait_properties::LOCATION, url);
        }
    } else if let Some(movie) = record.get_object("sg_uploaded_movie") {
        if let Some(url) = movie.get("url").and_then(|v| v.as_str()).filter(|s| !s.is_empty()) {
            data.set_property(trait_ids::LOCATABLE_CONTENT, trait_properties::LOCATION, url);
        }
    }
}

/// Expands the workfile's template; only the location trait is ever
/// populated. Other requested traits have no workfile counterpart and are
/// silently ignored.
fn resolve_workfile(
    ref_str: &str,
    template: &PathTemplate,
    fields: &[(String, FieldValue)],
    trait_set: &TraitSet,
) -> Result<TraitsData, BatchElementError> {
    let mut data = TraitsData::new();

    if trait_set.contains(trait_ids::LOCATABLE_CONTENT) {
        let path = template.apply_fields(fields).map_err(|e| {
            BatchElementError::new(
                ErrorCode::ResolutionError,
                format!("failed to expand template for '{ref_str}': {e}"),
            )
        })?;
        let url = path_to_file_url(&path).ok_or_else(|| {
            BatchElementError::new(
                ErrorCode::ResolutionError,
                format!("cannot express '{}' as a file URL", path.display()),
            )
        })?;
        data.set_property(trait_ids::LOCATABLE_CONTENT, trait_properties::LOCATION, url);
    }

    Ok(data)
}

fn path_to_file_url(path: &Path) -> Option<String> {
    Url::from_file_path(path).ok().map(|url| url.to_string())
}

fn read_only_error() -> BatchElementError {
    BatchElementError::new(ErrorCode::AccessError, "entities are read-only")
}

fn malformed_error(ref_str: &str) -> BatchElementError {
    BatchElementError::new(
        ErrorCode::MalformedReference,
        format!("malformed entity reference: '{ref_str}'"),
    )
}

fn not_found_error(ref_str: &str) -> BatchElementError {
    BatchElementError::new(
        ErrorCode::ResolutionError,
        format!("entity '{ref_str}' not found"),
    )
}

fn backend_error(ref_str: &str, error: &fpt_backend::BackendError) -> BatchElementError {
    BatchElementError::new(
        ErrorCode::ResolutionError,
        format!("backend query failed for '{ref_str}': {error}"),
    )
}
