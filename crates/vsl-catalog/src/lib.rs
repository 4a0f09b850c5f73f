//! Static metadata catalog: symbol name to completion category, plus the
//! ordered parameter list for callable symbols.
//!
//! The catalog is an explicit immutable value: build it once with
//! [`Catalog::builtin`] (or load an external metadata table with
//! [`Catalog::from_json`]) and pass it by reference into the suggestion
//! builder. There is no global registry and nothing mutates after
//! construction.

use indexmap::IndexMap;

mod builtin;

/// Functional classification of a catalog symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Category {
    /// Source generator: starts a chain (`osc`, `noise`, `shape`, ...).
    #[serde(rename = "src")]
    Source,
    /// Coordinate transform (`rotate`, `scale`, `kaleid`, ...).
    #[serde(rename = "coord")]
    Coord,
    /// Color transform (`color`, `contrast`, `posterize`, ...).
    #[serde(rename = "color")]
    Color,
    /// Blend combinator taking a second texture (`add`, `blend`, `diff`, ...).
    #[serde(rename = "combine")]
    Combine,
    /// Modulation combinator warping coordinates by a texture
    /// (`modulate`, `modulateScale`, ...).
    #[serde(rename = "combineCoord")]
    CombineCoord,
    /// External input source (`initCam`, `initImage`, ...).
    #[serde(rename = "external")]
    External,
    /// Output buffer. Globals `o0`..`o3`, and the callable sinks
    /// `out`/`render` that write into them.
    #[serde(rename = "output")]
    Output,
    /// Input buffer global (`s0`..`s3`).
    #[serde(rename = "source")]
    Input,
    /// Scalar global (`time`, `bpm`, `width`, ...).
    #[serde(rename = "number")]
    Scalar,
}

impl Category {
    /// Categories suggested after a dot in a fluent chain.
    pub fn is_chainable(self) -> bool {
        matches!(
            self,
            Category::Coord | Category::Color | Category::Combine | Category::CombineCoord
        )
    }

    /// Categories suggested at a fresh statement position.
    pub fn starts_chain(self) -> bool {
        matches!(self, Category::Source | Category::External)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Source => "src",
            Category::Coord => "coord",
            Category::Color => "color",
            Category::Combine => "combine",
            Category::CombineCoord => "combineCoord",
            Category::External => "external",
            Category::Output => "output",
            Category::Input => "source",
            Category::Scalar => "number",
        }
    }
}

/// Declared type of a positional parameter. Drives which value suggestions
/// the builder produces for that slot.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParamType {
    /// Numeric parameter; gets the default plus the canonical anchors.
    Float,
    /// Texture/sampler parameter; gets buffer and source suggestions.
    Texture,
    /// String parameter (URLs, stream names); gets the default only.
    Str,
    /// Anything else, raw declared type preserved.
    Other(String),
}

impl From<String> for ParamType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "float" | "number" | "int" => ParamType::Float,
            "sampler2D" | "tex" => ParamType::Texture,
            "string" | "url" => ParamType::Str,
            _ => ParamType::Other(raw),
        }
    }
}

impl From<ParamType> for String {
    fn from(ty: ParamType) -> String {
        match ty {
            ParamType::Float => "float".to_string(),
            ParamType::Texture => "sampler2D".to_string(),
            ParamType::Str => "string".to_string(),
            ParamType::Other(raw) => raw,
        }
    }
}

/// One positional parameter of a callable symbol.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ParamType,
    /// Rendered verbatim into value suggestions; absent for parameters with
    /// no sensible default (URLs, required textures).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// A catalog entry: name, category and the ordered parameter list.
/// Parameter order matches the DSL's positional call convention. Globals
/// are entries with an empty parameter list and a non-callable category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    pub name: String,
    pub category: Category,
    pub params: Vec<Param>,
}

impl FunctionSignature {
    /// Global variable: nothing to call, no parameters.
    pub fn is_global(&self) -> bool {
        self.params.is_empty()
            && matches!(
                self.category,
                Category::Scalar | Category::Output | Category::Input
            )
    }

    /// Callable sink routing a chain into an output buffer (`out`, `render`).
    pub fn is_output_sink(&self) -> bool {
        self.category == Category::Output && !self.params.is_empty()
    }

    pub fn param(&self, index: usize) -> Option<&Param> {
        self.params.get(index)
    }
}

/// Wire shape of one entry in an external metadata table, keyed by name.
#[derive(Debug, serde::Deserialize)]
struct RawSignature {
    #[serde(rename = "type")]
    category: Category,
    #[serde(default)]
    params: Vec<Param>,
}

/// The immutable symbol table. Iteration order is insertion order, which
/// fixes the order candidates appear in.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: IndexMap<String, FunctionSignature>,
}

impl Catalog {
    pub fn new() -> Self {
        Catalog::default()
    }

    /// Load a catalog from an external JSON metadata table of the form
    /// `{ "osc": { "type": "src", "params": [ { "name": "frequency",
    /// "type": "float", "default": "60" } ] }, ... }`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let entries: IndexMap<String, RawSignature> = serde_json::from_str(json)?;
        let mut catalog = Catalog::new();
        for (name, raw) in entries {
            catalog.insert(FunctionSignature {
                name,
                category: raw.category,
                params: raw.params,
            });
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, sig: FunctionSignature) {
        self.entries.insert(sig.name.clone(), sig);
    }

    pub fn get(&self, name: &str) -> Option<&FunctionSignature> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FunctionSignature> {
        self.entries.values()
    }

    pub fn of_category(&self, category: Category) -> impl Iterator<Item = &FunctionSignature> {
        self.iter().filter(move |sig| sig.category == category)
    }

    /// Entries suggested after a dot: the four transform/combinator
    /// categories, in catalog order.
    pub fn chainable(&self) -> impl Iterator<Item = &FunctionSignature> {
        self.iter().filter(|sig| sig.category.is_chainable())
    }

    /// Entries that can start a fresh chain.
    pub fn chain_starters(&self) -> impl Iterator<Item = &FunctionSignature> {
        self.iter().filter(|sig| sig.category.starts_chain())
    }

    /// Global variables of every kind.
    pub fn globals(&self) -> impl Iterator<Item = &FunctionSignature> {
        self.iter().filter(|sig| sig.is_global())
    }
}

#[cfg(test)]
mod catalog_tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let catalog = Catalog::builtin();
        let osc = catalog.get("osc").expect("osc should be builtin");
        assert_eq!(osc.category, Category::Source);
        assert_eq!(osc.params.len(), 3);
        assert_eq!(osc.params[0].name, "frequency");
        assert_eq!(osc.params[0].default.as_deref(), Some("60"));
    }

    #[test]
    fn test_builtin_globals() {
        let catalog = Catalog::builtin();
        let o0 = catalog.get("o0").expect("o0 should be builtin");
        assert!(o0.is_global());
        assert!(!o0.is_output_sink());
        assert_eq!(o0.category, Category::Output);

        let s0 = catalog.get("s0").unwrap();
        assert_eq!(s0.category, Category::Input);

        let time = catalog.get("time").unwrap();
        assert_eq!(time.category, Category::Scalar);
    }

    #[test]
    fn test_output_sinks() {
        let catalog = Catalog::builtin();
        let out = catalog.get("out").expect("out should be builtin");
        assert!(out.is_output_sink());
        assert!(!out.is_global());
        let render = catalog.get("render").unwrap();
        assert!(render.is_output_sink());
    }

    #[test]
    fn test_texture_params() {
        let catalog = Catalog::builtin();
        let modulate = catalog.get("modulate").unwrap();
        assert_eq!(modulate.category, Category::CombineCoord);
        assert_eq!(modulate.params[0].ty, ParamType::Texture);
        assert_eq!(modulate.params[1].ty, ParamType::Float);
    }

    #[test]
    fn test_chainable_excludes_sources_and_globals() {
        let catalog = Catalog::builtin();
        assert!(catalog.chainable().all(|sig| sig.category.is_chainable()));
        assert!(catalog.chainable().any(|sig| sig.name == "rotate"));
        assert!(!catalog.chainable().any(|sig| sig.name == "osc"));
        assert!(!catalog.chainable().any(|sig| sig.name == "o0"));
    }

    #[test]
    fn test_from_json_round_trip() {
        let json = r#"{
            "osc": {
                "type": "src",
                "params": [
                    { "name": "frequency", "type": "float", "default": "60" }
                ]
            },
            "o0": { "type": "output" },
            "wobble": {
                "type": "combineCoord",
                "params": [
                    { "name": "texture", "type": "sampler2D" },
                    { "name": "amount", "type": "float", "default": "0.1" }
                ]
            }
        }"#;
        let catalog = Catalog::from_json(json).expect("valid metadata table");
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get("osc").unwrap().category, Category::Source);
        assert!(catalog.get("o0").unwrap().is_global());
        let wobble = catalog.get("wobble").unwrap();
        assert_eq!(wobble.params[0].ty, ParamType::Texture);
        assert_eq!(wobble.params[0].default, None);
    }

    #[test]
    fn test_from_json_rejects_unknown_category() {
        let json = r#"{ "osc": { "type": "nonsense" } }"#;
        assert!(Catalog::from_json(json).is_err());
    }

    #[test]
    fn test_param_type_parsing() {
        assert_eq!(ParamType::from("float".to_string()), ParamType::Float);
        assert_eq!(ParamType::from("tex".to_string()), ParamType::Texture);
        assert_eq!(ParamType::from("sampler2D".to_string()), ParamType::Texture);
        assert_eq!(ParamType::from("string".to_string()), ParamType::Str);
        assert_eq!(
            ParamType::from("vec4".to_string()),
            ParamType::Other("vec4".to_string())
        );
    }
}
