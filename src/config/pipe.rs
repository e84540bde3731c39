//! Decoding of `pipe` blocks.
//!
//! A labeled, repeated block reaches us as
//!
//! ```text
//! pipe = [
//!     { "github.com/pipehub/sample" = [ { version = "v0.7.0", alias = "base" } ] },
//!     ...
//! ]
//! ```
//!
//! The label sits where a field name would normally be, so the generic field
//! decoder cannot see it. This pass walks the raw subtree and turns each label
//! into [`PipeConfig::import_path`].
//!
//! Unknown options inside a pipe are rejected. A mistyped `version` key would
//! otherwise silently build the wrong plugin revision.

use crate::config::node::GenericNode;
use crate::config::schema::{expect_mapping_list, expect_scalar, DecodeError, PipeConfig};

/// Decode the node bound to the top-level `pipe` key.
///
/// `None` (no `pipe` key at all) yields an empty list.
pub fn decode_pipes(raw: Option<&GenericNode>) -> Result<Vec<PipeConfig>, DecodeError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    let mut pipes = Vec::new();
    for (i, outer) in expect_mapping_list("pipe", raw)?.iter().enumerate() {
        // Normally exactly one label per element, but more are tolerated.
        for (label, inner) in outer {
            let label_path = format!("pipe[{}].{}", i, label);
            let inner = expect_mapping_list(&label_path, inner)?;
            for body in inner {
                let mut pipe = PipeConfig {
                    import_path: label.clone(),
                    ..PipeConfig::default()
                };

                for (key, node) in body {
                    let field = match key.as_str() {
                        "version" => &mut pipe.version,
                        "alias" => &mut pipe.alias,
                        "module" => &mut pipe.module,
                        _ => {
                            return Err(DecodeError::UnknownPipeKey {
                                import_path: label.clone(),
                                key: key.clone(),
                            })
                        }
                    };
                    *field = expect_scalar(&format!("{}.{}", label_path, key), node)?.to_string();
                }

                tracing::debug!(
                    import_path = %pipe.import_path,
                    version = %pipe.version,
                    alias = %pipe.alias,
                    "Decoded pipe"
                );
                pipes.push(pipe);
            }
        }
    }

    Ok(pipes)
}
