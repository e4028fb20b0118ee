//! Module catalog: enumeration and introspection.
//!
//! Listing is a read-only scan of the configured module root. Introspection
//! runs the module with `--interface-description` and projects the emitted
//! XML into a [`ModuleDescriptor`]; nothing is cached, so the schema always
//! reflects the installed module.

use std::sync::Arc;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use grassd_core::config::GrassConfig;
use grassd_core::error::GrassError;
use grassd_core::module::{
    ModuleCategory, ModuleDescriptor, ModuleEntry, ModuleList, Parameter, CATEGORY_PREFIXES,
    NOOP_PARAMETER_TYPE,
};

use crate::command;

/// Flag passed to a module to make it print its interface XML and exit.
const INTERFACE_FLAG: &str = "--interface-description";

/// Read-only view of the configured module catalog.
#[derive(Clone)]
pub struct ModuleRegistry {
    config: Arc<GrassConfig>,
}

impl ModuleRegistry {
    pub fn new(config: Arc<GrassConfig>) -> Self {
        Self { config }
    }

    /// Enumerate the module catalog.
    ///
    /// Scans the module root for entries carrying a recognized category
    /// prefix and classifies each by the first-character convention.
    /// Ordering follows filesystem enumeration and is not stable.
    pub fn list(&self) -> Result<ModuleList, GrassError> {
        let mut modules = Vec::new();
        for entry in std::fs::read_dir(&self.config.modules)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if CATEGORY_PREFIXES
                .iter()
                .any(|(prefix, _)| name.starts_with(prefix))
            {
                modules.push(ModuleEntry {
                    name: name.to_string(),
                    category: ModuleCategory::from_name(name),
                });
            }
        }
        Ok(ModuleList {
            count: modules.len(),
            modules,
        })
    }

    /// Introspect one module's declared parameters.
    ///
    /// Fails with [`GrassError::ModuleNotFound`] when the module cannot be
    /// resolved under the module root.
    pub async fn describe(&self, name: &str) -> Result<ModuleDescriptor, GrassError> {
        let program = self.config.module_path(name);
        if !program.exists() {
            return Err(GrassError::ModuleNotFound {
                name: name.to_string(),
            });
        }

        let mut cmd = tokio::process::Command::new(&program);
        cmd.arg(INTERFACE_FLAG);
        let output = command::run_checked(&mut cmd).await?;
        let xml = String::from_utf8_lossy(&output.stdout);

        parse_interface(name, &xml)
    }
}

// ---------------------------------------------------------------------------
// Interface-description XML projection
// ---------------------------------------------------------------------------

/// A `<parameter>` element being accumulated during the parse.
struct ParameterBuilder {
    name: String,
    declared_type: String,
    required: bool,
    description: String,
    default: Option<String>,
    prompt: Option<String>,
    is_output: bool,
}

impl ParameterBuilder {
    /// Project into the wire [`Parameter`].
    ///
    /// A `gisprompt` prompt (`raster`, `vector`, `coords`, ...) wins over
    /// the plain declared type, which is shortened to the engine's
    /// conventional tags (`str`, `int`, `float`).
    fn build(self) -> Parameter {
        let param_type = match self.prompt {
            Some(prompt) => prompt,
            None => match self.declared_type.as_str() {
                "string" => "str".to_string(),
                "integer" => "int".to_string(),
                "float" => "float".to_string(),
                other => other.to_string(),
            },
        };
        Parameter {
            name: self.name,
            description: self.description,
            param_type,
            required: self.required,
            default: self.default,
        }
    }
}

/// Which element's character data is currently being read.
#[derive(Clone, Copy, PartialEq)]
enum TextTarget {
    None,
    Description,
    Default,
}

/// Project a module's `--interface-description` XML into a descriptor.
///
/// Parameters declared with the no-op sentinel type are dropped; a
/// `gisprompt` with `age="new"` marks an output parameter. Flags and
/// `<values>` blocks are skipped entirely.
fn parse_interface(name: &str, xml: &str) -> Result<ModuleDescriptor, GrassError> {
    let malformed = |message: String| GrassError::Introspection {
        name: name.to_string(),
        message,
    };

    let mut reader = Reader::from_reader(xml.as_bytes());
    reader.config_mut().trim_text(true);

    let mut module_description = String::new();
    let mut inputs = Vec::new();
    let mut outputs = Vec::new();

    let mut current: Option<ParameterBuilder> = None;
    let mut target = TextTarget::None;
    let mut in_flag = false;
    let mut in_values = false;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.name().as_ref() == b"gisprompt" => {
                if let Some(param) = current.as_mut() {
                    if let Some(age) = attr(&e, "age").map_err(&malformed)? {
                        param.is_output = age == "new";
                    }
                    param.prompt = attr(&e, "prompt").map_err(&malformed)?;
                }
            }
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"parameter" => {
                    let p_name = attr(&e, "name")
                        .map_err(&malformed)?
                        .ok_or_else(|| malformed("parameter without a name".to_string()))?;
                    let declared_type = attr(&e, "type").map_err(&malformed)?.unwrap_or_default();
                    let required = attr(&e, "required").map_err(&malformed)?.as_deref()
                        == Some("yes");
                    current = Some(ParameterBuilder {
                        name: p_name,
                        declared_type,
                        required,
                        description: String::new(),
                        default: None,
                        prompt: None,
                        is_output: false,
                    });
                }
                b"flag" => in_flag = true,
                b"values" => in_values = true,
                b"description" if !in_flag && !in_values => target = TextTarget::Description,
                b"default" if current.is_some() => target = TextTarget::Default,
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"parameter" => {
                    if let Some(param) = current.take() {
                        if param.declared_type != NOOP_PARAMETER_TYPE {
                            let is_output = param.is_output;
                            let built = param.build();
                            if is_output {
                                outputs.push(built);
                            } else {
                                inputs.push(built);
                            }
                        }
                    }
                }
                b"flag" => in_flag = false,
                b"values" => in_values = false,
                b"description" | b"default" => target = TextTarget::None,
                _ => {}
            },
            Ok(Event::Text(t)) => {
                if target != TextTarget::None && !in_flag && !in_values {
                    let text = t.unescape().map_err(|e| malformed(e.to_string()))?;
                    match (target, current.as_mut()) {
                        (TextTarget::Description, Some(param)) => {
                            param.description.push_str(&text);
                        }
                        (TextTarget::Description, None) => module_description.push_str(&text),
                        (TextTarget::Default, Some(param)) => {
                            param.default = Some(text.into_owned());
                        }
                        (TextTarget::Default, None) => {}
                        (TextTarget::None, _) => {}
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(malformed(e.to_string())),
        }
        buf.clear();
    }

    Ok(ModuleDescriptor {
        name: name.to_string(),
        description: module_description,
        category: ModuleCategory::from_name(name),
        inputs,
        outputs,
    })
}

/// Read one attribute as an owned string, if present.
fn attr(e: &BytesStart<'_>, key: &str) -> Result<Option<String>, String> {
    match e.try_get_attribute(key) {
        Ok(Some(a)) => a
            .unescape_value()
            .map(|v| Some(v.into_owned()))
            .map_err(|err| err.to_string()),
        Ok(None) => Ok(None),
        Err(err) => Err(err.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
