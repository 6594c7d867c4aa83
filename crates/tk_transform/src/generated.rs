//! Removal of compiler-synthesized backing fields.
//!
//! Auto-properties decompile to a private field tagged with a
//! compiler-generated attribute next to the property itself. Once the
//! property is lowered the field is noise, so it is dropped up front.

use tk_ir::Namespace;
use tracing::debug;

use crate::pipeline::{PassError, Transform};

/// Bare attribute names found in captured attribute-section text.
///
/// `[field: System.Runtime.CompilerServices.CompilerGeneratedAttribute]`,
/// `[CompilerGenerated()]` and `[Serializable, CompilerGenerated]` all
/// yield `CompilerGenerated` among their names.
pub(crate) fn attribute_names(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '[' | ']' | ',' if depth == 0 => {
                segments.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    segments.push(&text[start..]);

    segments
        .into_iter()
        .filter_map(|segment| {
            let head = segment.split('(').next().unwrap_or(segment);
            let head = match head.split_once(':') {
                Some((_, rest)) => rest,
                None => head,
            };
            let name = normalize(head);
            (!name.is_empty()).then_some(name)
        })
        .collect()
}

fn normalize(name: &str) -> &str {
    let name = name.trim();
    let name = name.rsplit('.').next().unwrap_or(name).trim();
    match name.strip_suffix("Attribute") {
        Some(stem) if !stem.is_empty() => stem,
        _ => name,
    }
}

pub struct RemoveCompilerGeneratedField {
    attribute: String,
}

impl RemoveCompilerGeneratedField {
    pub fn new(attribute: &str) -> Self {
        Self {
            attribute: normalize(attribute).to_string(),
        }
    }

    fn is_generated(&self, attributes: &str) -> bool {
        attribute_names(attributes)
            .into_iter()
            .any(|name| name == self.attribute)
    }
}

impl Transform for RemoveCompilerGeneratedField {
    fn name(&self) -> &'static str {
        "RemoveCompilerGeneratedField"
    }

    fn run(&self, ns: &mut Namespace) -> Result<(), PassError> {
        if self.attribute.is_empty() {
            return Ok(());
        }
        for class in ns.classes_mut() {
            let before = class.fields.len();
            class
                .fields
                .retain(|field| !self.is_generated(&field.entity.attributes));
            let removed = before - class.fields.len();
            if removed > 0 {
                debug!(class = %class.name, removed, "removed compiler-generated fields");
            }
        }
        Ok(())
    }
}
