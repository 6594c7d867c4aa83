use tk_ir::Namespace;
use tracing::debug;

use crate::pipeline::{PassError, Transform};

/// Drops constructors whose body text mentions the license-check marker.
///
/// Purely textual: any constructor containing the marker substring goes,
/// whatever the surrounding code does with it. An empty marker disables the
/// pass.
pub struct RemoveLicenseMethod {
    marker: String,
}

impl RemoveLicenseMethod {
    pub fn new(marker: &str) -> Self {
        Self {
            marker: marker.to_string(),
        }
    }
}

impl Transform for RemoveLicenseMethod {
    fn name(&self) -> &'static str {
        "RemoveLicenseMethod"
    }

    fn run(&self, ns: &mut Namespace) -> Result<(), PassError> {
        if self.marker.is_empty() {
            return Ok(());
        }
        for class in ns.classes_mut() {
            let before = class.constructors.len();
            class
                .constructors
                .retain(|ctor| !ctor.body.text.contains(&self.marker));
            let removed = before - class.constructors.len();
            if removed > 0 {
                debug!(class = %class.name, removed, "removed license-check constructors");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tk_ir::{Body, Class, Constructor, Entity, Parameter};

    fn ctor(params: &[&str], body: &str) -> Constructor {
        Constructor {
            entity: Entity::new("Widget", ""),
            parameters: params.iter().map(|p| Parameter::new(*p, "int")).collect(),
            body: Body::new(body),
        }
    }

    fn namespace(ctors: Vec<Constructor>) -> Namespace {
        let mut class = Class::new("Widget");
        class.constructors = ctors;
        let mut ns = Namespace::new(Some("N".into()));
        ns.types.push(class.into());
        ns
    }

    #[test]
    fn only_marked_constructors_are_removed() {
        let plain = ctor(&["a"], "{ this.a = a; }");
        let mut ns = namespace(vec![
            ctor(&[], "{ LicenseManager.Validate(typeof(Widget), this); }"),
            plain.clone(),
        ]);

        RemoveLicenseMethod::new("LicenseManager").run(&mut ns).unwrap();
        assert_eq!(ns.class("Widget").unwrap().constructors, [plain]);
    }

    #[test]
    fn custom_marker_is_honoured() {
        let mut ns = namespace(vec![ctor(&[], "{ CheckLicense(); }")]);
        RemoveLicenseMethod::new("LicenseManager").run(&mut ns).unwrap();
        assert_eq!(ns.class("Widget").unwrap().constructors.len(), 1);

        RemoveLicenseMethod::new("CheckLicense").run(&mut ns).unwrap();
        assert!(ns.class("Widget").unwrap().constructors.is_empty());
    }

    #[test]
    fn empty_marker_removes_nothing() {
        let mut ns = namespace(vec![ctor(&[], "{ }")]);
        RemoveLicenseMethod::new("").run(&mut ns).unwrap();
        assert_eq!(ns.class("Widget").unwrap().constructors.len(), 1);
    }
}
