//! JSON serialization of navigation trees and header/footer data.
//!
//! Nothing here panics or returns an error: parse and shape failures come
//! back as a [`ValidationReport`] next to an empty value, so an import can
//! show field-level feedback instead of aborting the edit session.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::navigation::{FooterData, HeaderData, LayoutConfig, LinkTarget, NavigationNode};
use crate::validation::{validate_tree, FieldError, ValidationReport, DEFAULT_MAX_DEPTH};

/// Field used for JSON syntax errors.
pub const JSON_FIELD: &str = "json";

/// Field used when the top-level value has the wrong shape.
pub const ROOT_FIELD: &str = "root";

/// A deserialized value together with its validation outcome.
///
/// On failure `value` is the type's empty default.
#[derive(Debug, Clone, PartialEq)]
pub struct Imported<T> {
    pub value: T,
    pub validation: ValidationReport,
}

impl<T: Default> Imported<T> {
    fn rejected(validation: ValidationReport) -> Self {
        Self {
            value: T::default(),
            validation,
        }
    }
}

/// Result of importing a navigation tree.
pub type TreeImport = Imported<Vec<NavigationNode>>;

/// Pretty-print `value` as two-space indented JSON.
///
/// The navigation types only contain strings, numbers, booleans and
/// string-keyed maps, which always serialize.
fn to_pretty_json<T: Serialize + ?Sized>(value: &T, fallback: &str) -> String {
    match serde_json::to_string_pretty(value) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize navigation data");
            fallback.to_string()
        }
    }
}

fn parse(json: &str) -> Result<Value, ValidationReport> {
    serde_json::from_str(json)
        .map_err(|e| ValidationReport::single(JSON_FIELD, format!("Invalid JSON: {e}")))
}

fn convert<T: DeserializeOwned>(value: Value) -> Result<T, ValidationReport> {
    serde_json::from_value(value)
        .map_err(|e| ValidationReport::single(JSON_FIELD, format!("Invalid navigation data: {e}")))
}

// ---------------------------------------------------------------------------
// Trees
// ---------------------------------------------------------------------------

/// Serialize a navigation tree.
pub fn serialize(tree: &[NavigationNode]) -> String {
    to_pretty_json(tree, "[]")
}

/// Parse a navigation tree and validate it.
///
/// The parsed tree is returned even when validation fails so the caller can
/// decide whether to accept it.
pub fn deserialize(json: &str) -> TreeImport {
    deserialize_with_depth(json, DEFAULT_MAX_DEPTH)
}

/// [`deserialize`] with an explicit depth limit.
pub fn deserialize_with_depth(json: &str, max_depth: usize) -> TreeImport {
    let mut value = match parse(json) {
        Ok(value) => value,
        Err(report) => return Imported::rejected(report),
    };
    let Value::Array(nodes) = &mut value else {
        return Imported::rejected(ValidationReport::single(
            ROOT_FIELD,
            "Navigation data must be an array",
        ));
    };
    let mut target_errors = Vec::new();
    strip_invalid_targets(nodes, "", &mut target_errors);

    let tree: Vec<NavigationNode> = match convert(value) {
        Ok(tree) => tree,
        Err(report) => return Imported::rejected(report),
    };

    let mut validation = validate_tree(&tree, max_depth);
    validation.errors.extend(target_errors);
    validation.valid = validation.errors.is_empty();
    Imported {
        value: tree,
        validation,
    }
}

/// Drop `target` values that are not a known [`LinkTarget`], recording a
/// `"{path}.target"` error for each, so the rest of the tree still imports.
fn strip_invalid_targets(nodes: &mut [Value], prefix: &str, errors: &mut Vec<FieldError>) {
    for (index, node) in nodes.iter_mut().enumerate() {
        let Some(obj) = node.as_object_mut() else {
            continue;
        };
        let path = if prefix.is_empty() {
            index.to_string()
        } else {
            format!("{prefix}.{index}")
        };

        let valid = match obj.get("target") {
            None | Some(Value::Null) => true,
            Some(Value::String(raw)) => raw.parse::<LinkTarget>().is_ok(),
            Some(_) => false,
        };
        if !valid {
            obj.remove("target");
            errors.push(FieldError::new(
                format!("{path}.target"),
                "Target must be either _blank or _self",
            ));
        }

        if let Some(Value::Array(children)) = obj.get_mut("children") {
            strip_invalid_targets(children, &format!("{path}.children"), errors);
        }
    }
}

// ---------------------------------------------------------------------------
// Header / footer
// ---------------------------------------------------------------------------

fn require_array(obj: &serde_json::Map<String, Value>, key: &str, errors: &mut Vec<FieldError>) {
    if !obj.get(key).is_some_and(Value::is_array) {
        errors.push(FieldError::new(key, format!("{key} must be an array")));
    }
}

/// Parse JSON, check the object's shape, then convert to `T`.
fn deserialize_shaped<T: DeserializeOwned + Default>(
    json: &str,
    what: &str,
    check: impl FnOnce(&serde_json::Map<String, Value>, &mut Vec<FieldError>),
) -> Imported<T> {
    let value = match parse(json) {
        Ok(value) => value,
        Err(report) => return Imported::rejected(report),
    };
    let Some(obj) = value.as_object() else {
        return Imported::rejected(ValidationReport::single(
            ROOT_FIELD,
            format!("{what} must be an object"),
        ));
    };

    let mut errors = Vec::new();
    check(obj, &mut errors);
    if !errors.is_empty() {
        return Imported::rejected(ValidationReport::from_errors(errors));
    }

    match convert(value) {
        Ok(data) => Imported {
            value: data,
            validation: ValidationReport::ok(),
        },
        Err(report) => Imported::rejected(report),
    }
}

pub fn serialize_header_data(data: &HeaderData) -> String {
    to_pretty_json(data, r#"{"links":[],"actions":[]}"#)
}

/// Parse header data. `links` and `actions` must be arrays.
pub fn deserialize_header_data(json: &str) -> Imported<HeaderData> {
    deserialize_shaped(json, "Header data", |obj, errors| {
        require_array(obj, "links", errors);
        require_array(obj, "actions", errors);
    })
}

pub fn serialize_footer_data(data: &FooterData) -> String {
    to_pretty_json(
        data,
        r#"{"links":[],"secondaryLinks":[],"socialLinks":[],"footNote":""}"#,
    )
}

/// Parse footer data. The three link lists must be arrays and `footNote`
/// must be a string.
pub fn deserialize_footer_data(json: &str) -> Imported<FooterData> {
    deserialize_shaped(json, "Footer data", |obj, errors| {
        require_array(obj, "links", errors);
        require_array(obj, "secondaryLinks", errors);
        require_array(obj, "socialLinks", errors);
        if !obj.get("footNote").is_some_and(Value::is_string) {
            errors.push(FieldError::new("footNote", "footNote must be a string"));
        }
    })
}

// ---------------------------------------------------------------------------
// Export artifact
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument<'a> {
    header_data: &'a HeaderData,
    footer_data: &'a FooterData,
    layout: &'a LayoutConfig,
}

/// The JSON export artifact `{ headerData, footerData, layout }`.
pub fn serialize_export(header: &HeaderData, footer: &FooterData, layout: &LayoutConfig) -> String {
    let doc = ExportDocument {
        header_data: header,
        footer_data: footer,
        layout,
    };
    to_pretty_json(&doc, "{}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
