//! The staged classifier: ordered rule tables with a first-acceptable-wins
//! reducer.
//!
//! Stages run in a fixed order (command, create, edit). Within a stage the
//! first matching rule produces the stage's candidate; the stage wins only
//! when that candidate's confidence exceeds the stage threshold, otherwise
//! evaluation falls through to the next stage and finally to the fallback
//! tier.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::shape;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Create,
    Edit,
    Command,
}

/// Outcome of classification. Recomputed per call, never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedIntent {
    pub intent: Intent,
    /// Always within `[0, 1]`.
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
}

const COMMAND_ACCEPT: f64 = 0.8;
const CREATE_ACCEPT: f64 = 0.7;
const EDIT_ACCEPT: f64 = 0.5;

/// Pre-computed view of a code block, shared by every rule predicate.
pub(crate) struct Block<'a> {
    code: &'a str,
    language: &'a str,
    first_line: &'a str,
    first_code_line: &'a str,
    line_count: usize,
}

impl<'a> Block<'a> {
    fn new(code: &'a str, language: &'a str) -> Self {
        let code = code.trim();
        let first_line = code.lines().next().unwrap_or("");
        let first_code_line = code
            .lines()
            .find(|line| !line.trim().is_empty() && !shape::is_comment_line(line))
            .unwrap_or("");
        Self {
            code,
            language,
            first_line,
            first_code_line,
            line_count: code.lines().count(),
        }
    }

    /// An explicit file signal (path comment, filename heading, `lang:path`
    /// tag) outranks generic command verbs.
    fn has_file_signal(&self) -> bool {
        shape::path_from_first_line(self.first_line).is_some()
            || shape::language_tag_path(self.language).is_some()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Extraction {
    target: Option<String>,
    anchor: Option<String>,
}

impl Extraction {
    fn none() -> Self {
        Self::default()
    }

    fn target(path: impl Into<String>) -> Self {
        Self {
            target: Some(path.into()),
            anchor: None,
        }
    }

    fn anchor(name: impl Into<String>) -> Self {
        Self {
            target: None,
            anchor: Some(name.into()),
        }
    }
}

/// One `(predicate, confidence, extractor)` entry; `matches` fuses the
/// predicate with its extractor so the two cannot drift apart.
pub(crate) struct Rule {
    pub(crate) name: &'static str,
    pub(crate) confidence: f64,
    pub(crate) matches: fn(&Block<'_>) -> Option<Extraction>,
}

pub(crate) struct Stage {
    pub(crate) intent: Intent,
    /// Accept when the candidate's confidence is strictly above this.
    pub(crate) threshold: f64,
    pub(crate) rules: &'static [Rule],
}

impl Stage {
    /// First matching rule is the stage's candidate; sub-threshold candidates
    /// decline the whole stage rather than trying later rules, preserving the
    /// sequential-conditional semantics the tables replaced.
    fn evaluate(&self, block: &Block<'_>) -> Option<(&'static str, DetectedIntent)> {
        let (rule, extraction) = self
            .rules
            .iter()
            .find_map(|rule| (rule.matches)(block).map(|extraction| (rule, extraction)))?;
        if rule.confidence <= self.threshold {
            return None;
        }
        Some((
            rule.name,
            DetectedIntent {
                intent: self.intent,
                confidence: rule.confidence,
                target: extraction.target,
                anchor: extraction.anchor,
            },
        ))
    }
}

pub(crate) static STAGES: &[Stage] = &[
    Stage {
        intent: Intent::Command,
        threshold: COMMAND_ACCEPT,
        rules: COMMAND_RULES,
    },
    Stage {
        intent: Intent::Create,
        threshold: CREATE_ACCEPT,
        rules: CREATE_RULES,
    },
    Stage {
        intent: Intent::Edit,
        threshold: EDIT_ACCEPT,
        rules: EDIT_RULES,
    },
];

/// Classify a code block.
///
/// `active_file_hint` is the name of the file the user currently has open, if
/// any; it only influences the fallback tier.
pub fn detect(code: &str, language: &str, active_file_hint: Option<&str>) -> DetectedIntent {
    let block = Block::new(code, language);
    for stage in STAGES {
        if let Some((rule, detected)) = stage.evaluate(&block) {
            tracing::debug!(
                intent = ?detected.intent,
                confidence = detected.confidence,
                rule,
                "classified code block"
            );
            return detected;
        }
    }

    let detected = if active_file_hint.is_some() && block.line_count < 50 {
        DetectedIntent {
            intent: Intent::Edit,
            confidence: 0.4,
            target: None,
            anchor: None,
        }
    } else {
        DetectedIntent {
            intent: Intent::Create,
            confidence: 0.3,
            target: None,
            anchor: None,
        }
    };
    tracing::debug!(
        intent = ?detected.intent,
        confidence = detected.confidence,
        rule = "fallback",
        "classified code block"
    );
    detected
}

// ---------------------------------------------------------------------------
// Command stage

static COMMAND_RULES: &[Rule] = &[
    Rule {
        name: "shell_prompt",
        confidence: 0.95,
        matches: shell_prompt,
    },
    Rule {
        name: "package_manager",
        confidence: 0.9,
        matches: package_manager,
    },
    Rule {
        name: "vcs_or_container",
        confidence: 0.9,
        matches: vcs_or_container,
    },
    Rule {
        name: "cli_tool",
        confidence: 0.85,
        matches: cli_tool,
    },
    Rule {
        name: "bare_single_line",
        confidence: 0.4,
        matches: bare_single_line,
    },
];

fn shell_prompt(block: &Block<'_>) -> Option<Extraction> {
    let rest = block.first_line.strip_prefix(['$', '>', '%'])?;
    let rest = rest.strip_prefix(char::is_whitespace)?;
    (!rest.trim().is_empty()).then(Extraction::none)
}

static PACKAGE_MANAGER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:npm|yarn|pnpm|npx|pip3?|cargo|go)\s+(?:install|run|start|test|build|dev|init|create)\b")
        .unwrap()
});

fn package_manager(block: &Block<'_>) -> Option<Extraction> {
    if block.has_file_signal() {
        return None;
    }
    PACKAGE_MANAGER
        .is_match(block.first_line)
        .then(Extraction::none)
}

static VCS_OR_CONTAINER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:git|docker|kubectl)\s+[a-z][\w-]*").unwrap());

fn vcs_or_container(block: &Block<'_>) -> Option<Extraction> {
    if block.has_file_signal() {
        return None;
    }
    VCS_OR_CONTAINER
        .is_match(block.first_line)
        .then(Extraction::none)
}

const CLI_TOOLS: &[&str] = &[
    "curl", "wget", "ssh", "scp", "chmod", "chown", "mkdir", "rm", "cp", "mv", "cat", "grep",
    "find", "tar", "touch", "ls", "make", "sudo", "brew", "apt", "apt-get", "echo",
];

fn cli_tool(block: &Block<'_>) -> Option<Extraction> {
    if block.has_file_signal() {
        return None;
    }
    let first_word = block.first_line.split_whitespace().next()?;
    CLI_TOOLS
        .iter()
        .any(|tool| first_word.eq_ignore_ascii_case(tool))
        .then(Extraction::none)
}

static CODE_SYNTAX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:function|class|def|import|require|use|const|let|var|fn|func)\b|=>|=")
        .unwrap()
});

fn bare_single_line(block: &Block<'_>) -> Option<Extraction> {
    (block.line_count == 1 && !CODE_SYNTAX.is_match(block.first_line)).then(Extraction::none)
}

// ---------------------------------------------------------------------------
// Create stage

static CREATE_RULES: &[Rule] = &[
    Rule {
        name: "path_comment",
        confidence: 0.95,
        matches: path_comment,
    },
    Rule {
        name: "filename_heading",
        confidence: 0.9,
        matches: filename_heading,
    },
    Rule {
        name: "lang_path_tag",
        confidence: 0.9,
        matches: lang_path_tag,
    },
    Rule {
        name: "complete_module",
        confidence: 0.7,
        matches: complete_module,
    },
    Rule {
        name: "config_signature",
        confidence: 0.85,
        matches: config_signature,
    },
];

fn path_comment(block: &Block<'_>) -> Option<Extraction> {
    shape::path_from_comment(block.first_line).map(Extraction::target)
}

fn filename_heading(block: &Block<'_>) -> Option<Extraction> {
    shape::path_from_heading(block.first_line).map(Extraction::target)
}

fn lang_path_tag(block: &Block<'_>) -> Option<Extraction> {
    shape::language_tag_path(block.language).map(|(_, path)| Extraction::target(path))
}

static TOP_LEVEL_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^(?:export\s+|pub\s+)?(?:abstract\s+|async\s+)?(?:function|class|fn|def|func)\b")
        .unwrap()
});

fn complete_module(block: &Block<'_>) -> Option<Extraction> {
    if block.line_count <= 20 {
        return None;
    }
    let has_import = block.code.lines().any(shape::is_import_line);
    let has_body = block.code.lines().any(|line| {
        let t = line.trim_start();
        t.starts_with("export ") || t.contains("module.exports")
    }) || TOP_LEVEL_DECL.is_match(block.code);
    (has_import && has_body).then(Extraction::none)
}

static DOCKER_VERB: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^(?:run|cmd|copy|add|expose|workdir|entrypoint|env)\b").unwrap());

fn config_signature(block: &Block<'_>) -> Option<Extraction> {
    let code = block.code;
    let json = code.starts_with('{');
    let package_manifest = json
        && code.contains("\"name\"")
        && (code.contains("\"version\"")
            || code.contains("\"dependencies\"")
            || code.contains("\"scripts\""));
    let compiler_config = json && code.contains("\"compilerOptions\"");
    let cargo_manifest = code.lines().any(|line| {
        matches!(
            line.trim(),
            "[package]" | "[dependencies]" | "[workspace]" | "[project]"
        )
    });
    let go_module = block.first_line.starts_with("module ")
        && code
            .lines()
            .any(|line| line.trim_start().starts_with("go 1"));
    let container_build = {
        let first = block.first_line.get(..5).unwrap_or("");
        first.eq_ignore_ascii_case("from ") && DOCKER_VERB.is_match(code)
    };
    let compose = code
        .lines()
        .any(|line| line.trim_end() == "services:")
        && code
            .lines()
            .any(|line| line.trim_start().starts_with("image:") || line.trim_start().starts_with("build:"));

    (package_manifest || compiler_config || cargo_manifest || go_module || container_build
        || compose)
        .then(Extraction::none)
}

// ---------------------------------------------------------------------------
// Edit stage

static EDIT_RULES: &[Rule] = &[
    Rule {
        name: "imports_only",
        confidence: 0.85,
        matches: imports_only,
    },
    Rule {
        name: "top_level_decl",
        confidence: 0.7,
        matches: top_level_decl,
    },
    Rule {
        name: "keyword_def",
        confidence: 0.7,
        matches: keyword_def,
    },
    Rule {
        name: "method_call",
        confidence: 0.6,
        matches: method_call,
    },
    Rule {
        name: "small_fragment",
        confidence: 0.5,
        matches: small_fragment,
    },
];

fn imports_only(block: &Block<'_>) -> Option<Extraction> {
    if block.line_count == 0 || block.line_count > 3 {
        return None;
    }
    let mut lines = block.code.lines().filter(|line| !line.trim().is_empty());
    let mut any = false;
    for line in &mut lines {
        if !shape::is_import_line(line) {
            return None;
        }
        any = true;
    }
    any.then(|| Extraction::anchor("imports"))
}

static FUNCTION_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:export\s+)?(?:async\s+)?function\s*\*?\s*([A-Za-z_$][\w$]*)").unwrap()
});

static VARIABLE_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:export\s+)?(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*=").unwrap()
});

fn top_level_decl(block: &Block<'_>) -> Option<Extraction> {
    if block.line_count >= 30 {
        return None;
    }
    let line = block.first_code_line.trim_start();
    FUNCTION_DECL
        .captures(line)
        .or_else(|| VARIABLE_DECL.captures(line))
        .map(|captures| Extraction::anchor(&captures[1]))
}

static KEYWORD_DEF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:pub\s+)?(?:async\s+)?(?:fn|def|func)\s+(?:\([^)]*\)\s*)?([A-Za-z_][\w]*)")
        .unwrap()
});

fn keyword_def(block: &Block<'_>) -> Option<Extraction> {
    if block.line_count >= 30 {
        return None;
    }
    KEYWORD_DEF
        .captures(block.first_code_line.trim_start())
        .map(|captures| Extraction::anchor(&captures[1]))
}

static CALL_SHAPED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z_$][\w$]*)(?:\.[\w$]+)*\s*\(").unwrap());

static CLASS_KEYWORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bclass\b").unwrap());

fn method_call(block: &Block<'_>) -> Option<Extraction> {
    if block.line_count >= 40 || CLASS_KEYWORD.is_match(block.code) {
        return None;
    }
    CALL_SHAPED
        .captures(block.first_code_line.trim_start())
        .map(|captures| Extraction::anchor(&captures[1]))
}

fn small_fragment(block: &Block<'_>) -> Option<Extraction> {
    (block.line_count < 20 && !shape::looks_like_complete_file(block.code))
        .then(Extraction::none)
}
