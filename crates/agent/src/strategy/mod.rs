//! Assembly strategies: resolve an [`Instruction`] against a registry into
//! an [`InvocationContext`].
//!
//! Strategies are pure: the same instruction and registry always produce the
//! same frames, and nothing is kept between calls. Every reference is
//! resolved through [`ModuleRegistry::get`], so aliases work everywhere.
//!
//! | Strategy        | Output                | Unresolved references          |
//! |-----------------|-----------------------|--------------------------------|
//! | `Concatenation` | one combined text     | marker comment (goals skipped) |
//! | `Structured`    | one frame per unit    | frame omitted                  |

mod concat;
mod structured;

use std::fmt;
use std::str::FromStr;

use dcl_core::{Instruction, InvocationContext, Module};
use dcl_registry::ModuleRegistry;
use serde::{Deserialize, Serialize};

/// Answer-format block placed after the instruction text by every strategy.
///
/// Shows the generation service one instruction, the acknowledgement it is
/// expected to give, and the artifact fenced and tagged with its module id.
pub const EXEMPLAR: &str = r#"# AGENT ANSWER FORMAT and EXAMPLE

human:
```
WRITE PromptModule('sys/goals/completeness_consistency.yaml')
FROM 'sowftware engineering best practices'
USING Lens(sys/lenses/component_arch_v2', 'sys/frameworks/dcl_core/v22.2')
```

agent:
Принято. Выполнение операции `WRITE` для сущности 'PROMPT_MODULE'.

**Исполнитель:** Агент-Методолог (использующий логику `sys/ops/write_v4.md`).
**Интенция:** Создать модуль Цели (`GOAL`), который заставит Оператора приоритезировать полноту и непротиворечивость данных.
**Линзы:** DCL Domain Ontology and Specification, Компонентная Архитектура v2.0.

---

### Артефакт: `sys/goals/completeness_consistency.yaml`

```sys/goals/completeness_consistency.yaml
...  результат генерации
```"#;

/// How resolved modules are laid out in the invocation context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssemblyStrategy {
    /// Everything joined into a single text frame.
    Concatenation,
    /// One text frame per resolved unit.
    #[default]
    Structured,
}

impl AssemblyStrategy {
    /// Resolve `instruction` against `registry`. Never fails; missing
    /// references are handled per strategy.
    pub fn assemble(&self, instruction: &Instruction, registry: &ModuleRegistry) -> InvocationContext {
        match self {
            Self::Concatenation => concat::assemble(instruction, registry),
            Self::Structured => structured::assemble(instruction, registry),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Concatenation => "concatenation",
            Self::Structured => "structured",
        }
    }
}

impl fmt::Display for AssemblyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown strategy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown assembly strategy '{0}' (expected 'structured' or 'concatenation')")]
pub struct UnknownStrategy(pub String);

impl FromStr for AssemblyStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "concatenation" | "concat" => Ok(Self::Concatenation),
            "structured" | "native" => Ok(Self::Structured),
            other => Err(UnknownStrategy(other.to_string())),
        }
    }
}

/// Format a resolved module for inclusion in a context.
///
/// `RESOURCE` modules are fenced and tagged with their id; anything else is
/// returned unchanged.
pub fn format_module(module: &Module) -> String {
    if module.is_resource() {
        format!("```{}\n{}\n```", module.id, module.content)
    } else {
        module.content.clone()
    }
}
