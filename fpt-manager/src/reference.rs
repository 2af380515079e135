//! Parsing of `fpt://` entity reference strings.

use fpt_backend::{FieldValue, PathTemplate, TemplateEngine};
use fpt_types::REFERENCE_PREFIX;

/// A structurally valid entity reference, parsed but not yet resolved.
///
/// Immutable once constructed; carries the original string form so error
/// messages can quote the reference verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedReference {
    /// A database record, identified by composite (type, id) key.
    Asset {
        ref_str: String,
        entity_type: String,
        id: i64,
    },
    /// An on-disk location, identified by a path template and its field
    /// values in template key order.
    Workfile {
        ref_str: String,
        template: PathTemplate,
        fields: Vec<(String, FieldValue)>,
    },
}

impl ParsedReference {
    /// The original reference string.
    #[must_use]
    pub fn ref_str(&self) -> &str {
        match self {
            Self::Asset { ref_str, .. } | Self::Workfile { ref_str, .. } => ref_str,
        }
    }
}

/// Parses an entity reference string into its components. Performs no I/O
/// beyond template lookup in the (already loaded) engine.
///
/// Returns `None` for anything structurally invalid: missing prefix, too few
/// segments, unknown reference kind, a non-integer asset id, an unavailable
/// template engine or unknown template, a field count differing from the
/// template's key count, or any field value failing type coercion.
#[must_use]
pub fn parse_reference(
    ref_str: &str,
    templates: Option<&dyn TemplateEngine>,
) -> Option<ParsedReference> {
    let rest = ref_str.strip_prefix(REFERENCE_PREFIX)?;

    let mut segments = rest.split('/');
    let kind = segments.next()?;
    let parts: Vec<&str> = segments.collect();

    if parts.len() < 2 {
        return None;
    }

    match kind {
        "asset" => parse_asset(ref_str, &parts),
        "workfile" => parse_workfile(ref_str, &parts, templates?),
        _ => None,
    }
}

/// `fpt://asset/{type}/{id}` — exactly two segments, integer id.
fn parse_asset(ref_str: &str, parts: &[&str]) -> Option<ParsedReference> {
    let [entity_type, id_str] = parts else {
        return None;
    };

    let id: i64 = id_str.parse().ok()?;

    Some(ParsedReference::Asset {
        ref_str: ref_str.to_string(),
        entity_type: (*entity_type).to_string(),
        id,
    })
}

/// `fpt://workfile/{template_name}/{field}/...` — field values are zipped
/// positionally against the template's ordered keys.
///
/// The value count must match the key count exactly. Coercion itself stays
/// lenient (unpadded version numbers are fine), but any single coercion
/// failure invalidates the whole reference.
fn parse_workfile(
    ref_str: &str,
    parts: &[&str],
    templates: &dyn TemplateEngine,
) -> Option<ParsedReference> {
    let (template_name, values) = parts.split_first()?;

    let template = templates.template(template_name)?.clone();
    let keys = template.ordered_keys();

    if values.len() != keys.len() {
        return None;
    }

    let fields: Vec<(String, FieldValue)> = keys
        .iter()
        .zip(values)
        .map(|(key, value)| Some((key.name.clone(), key.coerce(value)?)))
        .collect::<Option<_>>()?;

    Some(ParsedReference::Workfile {
        ref_str: ref_str.to_string(),
        template,
        fields,
    })
}
