use crate::de::{lenient, string_like, string_or_empty};
use crate::error::{ModelError, ModelResult};
use crate::props::ComponentProps;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_AB_WEIGHT: f64 = 50.0;

/// One node of the page tree as the editor stores it: a flat record with a
/// parent pointer and an untyped props bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub id: String,
    #[serde(rename = "type", default, deserialize_with = "string_or_empty")]
    pub component_type: String,
    /// `None` (or blank) places the component at the document root
    #[serde(default, deserialize_with = "string_like")]
    pub parent_id: Option<String>,
    /// Sibling lane under a multi-column parent
    #[serde(default, deserialize_with = "lenient")]
    pub column: i64,
    /// Sort key within a lane
    #[serde(default, deserialize_with = "lenient")]
    pub order: i64,
    #[serde(default)]
    pub props: Value,
    #[serde(default, deserialize_with = "lenient")]
    pub ab_test_enabled: bool,
    /// Partial prop overrides; index 0 is variant "B"
    #[serde(default, deserialize_with = "lenient")]
    pub ab_test_variants: Vec<Value>,
    /// Percentage of visitors assigned to variant "B"
    #[serde(default, deserialize_with = "lenient")]
    pub ab_test_weight: Option<f64>,
}

impl Component {
    /// Minimal component, mostly for tests and programmatic documents
    pub fn new(id: impl Into<String>, component_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            component_type: component_type.into(),
            parent_id: None,
            column: 0,
            order: 0,
            props: Value::Object(Map::new()),
            ab_test_enabled: false,
            ab_test_variants: Vec::new(),
            ab_test_weight: None,
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_position(mut self, column: i64, order: i64) -> Self {
        self.column = column;
        self.order = order;
        self
    }

    pub fn with_props(mut self, props: Value) -> Self {
        self.props = props;
        self
    }

    /// Lift the stored props into the typed union
    pub fn typed_props(&self) -> ModelResult<ComponentProps> {
        self.typed_with(&self.props)
    }

    /// Lift an arbitrary props bag (e.g. a merged A/B variant) against this
    /// component's type tag
    pub fn typed_with(&self, props: &Value) -> ModelResult<ComponentProps> {
        if !ComponentProps::is_known_type(&self.component_type) {
            return Err(ModelError::UnknownComponentType {
                component_type: self.component_type.clone(),
            });
        }

        let props = match props {
            Value::Null => Value::Object(Map::new()),
            Value::Object(_) => props.clone(),
            _ => {
                return Err(ModelError::PropsNotObject {
                    id: self.id.clone(),
                })
            }
        };

        let mut tagged = Map::new();
        tagged.insert(
            "type".to_string(),
            Value::String(self.component_type.clone()),
        );
        tagged.insert("props".to_string(), props);

        serde_json::from_value(Value::Object(tagged)).map_err(|e| ModelError::InvalidProps {
            id: self.id.clone(),
            component_type: self.component_type.clone(),
            reason: e.to_string(),
        })
    }

    /// A/B weight for variant "B", clamped to 0..=100
    pub fn ab_weight(&self, default_weight: f64) -> f64 {
        self.ab_test_weight
            .unwrap_or(default_weight)
            .clamp(0.0, 100.0)
    }
}
