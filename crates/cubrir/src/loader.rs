//! Candidate file loading and entry-point resolution.

use crate::analyzer::{instrument, StaticPlan};
use crate::lang::{parse_module, Module};
use crate::result::{CubrirError, CubrirResult};
use std::fs;
use std::path::Path;
use tracing::debug;

/// A loaded candidate: parsed, instrumented, entry point resolved.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Origin of the source (path or synthetic label)
    pub origin: String,
    /// Raw source text, kept for report rendering
    pub source: String,
    /// Parsed and instrumented module
    pub module: Module,
    /// Static coverage denominators for this module
    pub plan: StaticPlan,
    /// Name the test cases call; resolves through aliases at run time
    pub entry: String,
}

/// Load and parse a candidate file, resolving its entry point.
pub fn load_candidate(path: &Path) -> CubrirResult<Candidate> {
    let origin = path.display().to_string();
    let source = fs::read_to_string(path)
        .map_err(|e| CubrirError::load(&origin, e.to_string()))?;
    candidate_from_source(&source, &origin)
}

/// Build a candidate from in-memory source.
///
/// The entry point resolves in order: a module-level `candidate = name`
/// alias that reaches a defined function, then a function literally named
/// `candidate`, then the sole public function of the module. Anything
/// else is a load error.
pub fn candidate_from_source(source: &str, origin: &str) -> CubrirResult<Candidate> {
    let mut module = parse_module(source)?;
    let entry = resolve_entry(&module, origin)?;
    // Tests always call `candidate(...)`; bridge to a differently-named
    // sole function with a synthetic alias.
    if entry != "candidate" {
        module.aliases.push(("candidate".to_string(), entry.clone()));
    }
    let plan = instrument(&mut module);
    debug!(
        origin,
        entry,
        statements = plan.statement_total(),
        branch_edges = plan.branch_edge_total(),
        "candidate loaded"
    );
    Ok(Candidate {
        origin: origin.to_string(),
        source: source.to_string(),
        module,
        plan,
        entry,
    })
}

fn resolve_entry(module: &Module, origin: &str) -> CubrirResult<String> {
    if module.functions.is_empty() {
        return Err(CubrirError::load(
            origin,
            "no function definitions in candidate file",
        ));
    }
    // An alias or function named `candidate` wins only when it actually
    // reaches a definition; a dangling alias falls through to the rules
    // below.
    if module.resolve_function("candidate").is_some() {
        return Ok("candidate".to_string());
    }
    // Underscore-prefixed functions are private helpers, never the entry.
    let public: Vec<&str> = module
        .functions
        .iter()
        .map(|f| f.name.as_str())
        .filter(|name| !name.starts_with('_'))
        .collect();
    match public.as_slice() {
        [single] => Ok((*single).to_string()),
        [] => Err(CubrirError::load(
            origin,
            "no public function to use as entry point",
        )),
        names => Err(CubrirError::load(
            origin,
            format!(
                "cannot determine entry point among multiple functions ({}); \
                 add a `candidate = <name>` alias",
                names.join(", ")
            ),
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_single_function_is_entry() {
        let c = candidate_from_source("def solve(x):\n    return x\n", "mem").unwrap();
        assert_eq!(c.entry, "solve");
        // calls to `candidate` resolve through the synthetic alias
        assert!(c
            .module
            .aliases
            .iter()
            .any(|(t, s)| t == "candidate" && s == "solve"));
        assert_eq!(c.plan.statement_total(), 1);
    }

    #[test]
    fn test_candidate_named_function_wins() {
        let source = "def helper(x):\n    return x\n\ndef candidate(x):\n    return helper(x)\n";
        let c = candidate_from_source(source, "mem").unwrap();
        assert_eq!(c.entry, "candidate");
    }

    #[test]
    fn test_alias_marks_entry() {
        let source = "def solve(x):\n    return x\n\ndef helper(x):\n    return x\n\ncandidate = solve\n";
        let c = candidate_from_source(source, "mem").unwrap();
        assert_eq!(c.entry, "candidate");
    }

    #[test]
    fn test_dangling_alias_falls_back_to_public_function() {
        // A misspelled alias must not shadow the sole public function.
        let source = "def solve(x):\n    return x\n\ncandidate = solvr\n";
        let c = candidate_from_source(source, "mem").unwrap();
        assert_eq!(c.entry, "solve");
        assert_eq!(
            c.module.resolve_function("candidate").unwrap().name,
            "solve"
        );
    }

    #[test]
    fn test_underscore_helpers_do_not_count_as_entry() {
        let source = "def _helper(x):\n    return x + 1\n\ndef solve(x):\n    return _helper(x)\n";
        let c = candidate_from_source(source, "mem").unwrap();
        assert_eq!(c.entry, "solve");
    }

    #[test]
    fn test_only_private_functions_is_load_error() {
        let err = candidate_from_source("def _a(x):\n    return x\n", "mem").unwrap_err();
        assert!(err.is_fatal_load());
    }

    #[test]
    fn test_ambiguous_module_is_load_error() {
        let source = "def a(x):\n    return x\n\ndef b(x):\n    return x\n";
        let err = candidate_from_source(source, "mem").unwrap_err();
        assert!(err.is_fatal_load());
        assert!(err.to_string().contains("entry point"));
    }

    #[test]
    fn test_empty_module_is_load_error() {
        let err = candidate_from_source("x = 1\n", "mem").unwrap_err();
        assert!(err.is_fatal_load());
    }

    #[test]
    fn test_parse_failure_propagates() {
        let err = candidate_from_source("def broken(:\n    return 1\n", "mem").unwrap_err();
        assert!(matches!(err, CubrirError::Parse { .. }));
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let err = load_candidate(Path::new("/nonexistent/candidate.py")).unwrap_err();
        assert!(matches!(err, CubrirError::Load { .. }));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cand.py");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "def twice(x):\n    return x * 2").unwrap();
        let c = load_candidate(&path).unwrap();
        assert_eq!(c.entry, "twice");
        assert!(c.source.contains("def twice"));
    }
}
