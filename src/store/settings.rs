//! Structured settings loading.

use super::ConfigStore;
use crate::error::ConfigResult;
use crate::types::ConfigKind;
use serde_yaml::{Mapping, Value};

/// Rewrite a legacy `layout` sequence into a mapping.
///
/// Older settings files list layout sections as a sequence of single-key
/// mappings (`layout: [{Media: {...}}, {Tools: {...}}]`). The current form
/// is a single mapping from section name to its settings. Sequence items
/// that are not mappings are dropped; a mapping with several keys
/// contributes only its first.
pub fn normalize_layout(settings: &mut Value) {
    let Some(layout) = settings.get_mut("layout") else {
        return;
    };
    let Value::Sequence(items) = &mut *layout else {
        return;
    };

    let mut sections = Mapping::new();
    for item in items.drain(..) {
        if let Value::Mapping(entry) = item
            && let Some((name, section)) = entry.into_iter().next()
        {
            sections.insert(name, section);
        }
    }
    *layout = Value::Mapping(sections);
}

impl ConfigStore {
    /// Load a dashboard's settings as a structured value: bootstrapped from
    /// the skeleton if missing, environment-substituted, and with the layout
    /// normalized. An empty document yields an empty mapping.
    pub fn load_settings(&self, dashboard_id: &str) -> ConfigResult<Value> {
        let mut settings = match self.load_document(dashboard_id, ConfigKind::Settings)? {
            Value::Null => Value::Mapping(Mapping::new()),
            other => other,
        };
        normalize_layout(&mut settings);
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_legacy_layout_converted() {
        let mut settings = yaml("layout: [{Section: {foo: 1}}, {Other: {bar: 2}}]");
        normalize_layout(&mut settings);
        assert_eq!(
            settings,
            yaml("layout: {Section: {foo: 1}, Other: {bar: 2}}")
        );
    }

    #[test]
    fn test_layout_order_preserved() {
        let mut settings = yaml("layout: [{B: {}}, {A: {}}, {C: {}}]");
        normalize_layout(&mut settings);
        let keys: Vec<&str> = settings["layout"]
            .as_mapping()
            .unwrap()
            .keys()
            .map(|k| k.as_str().unwrap())
            .collect();
        assert_eq!(keys, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_mapping_layout_untouched() {
        let mut settings = yaml("title: x\nlayout: {Media: {style: row}}");
        let expected = settings.clone();
        normalize_layout(&mut settings);
        assert_eq!(settings, expected);
    }

    #[test]
    fn test_no_layout_untouched() {
        let mut settings = yaml("title: x");
        normalize_layout(&mut settings);
        assert_eq!(settings, yaml("title: x"));
    }
}
