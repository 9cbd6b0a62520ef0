//! Completing variable metadata the input did not supply.
//!
//! The Data Cube builder never talks to a terminal. Anything missing is
//! requested through [`FieldCompletion`]; [`PromptCompletion`] implements the
//! ask-until-valid policy over any [`Prompt`], so the binaries plug in stdin
//! while tests plug in a [`ScriptedPrompt`].

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use fairlinked_graph::{vocab, Graph, Term};

use crate::error::{Error, Result};

/// Study stages a measured variable may be attributed to.
pub const STUDY_STAGES: [&str; 9] = [
    "Synthesis",
    "Formulation",
    "Materials Processing",
    "Sample",
    "Tool",
    "Recipe",
    "Result",
    "Analysis",
    "Modelling",
];

/// Built-in QUDT units, grouped by quantity kind.
const BUILTIN_UNITS: &[(&str, &[&str])] = &[
    ("Temperature", &["DEG_C", "DEG_F", "K"]),
    ("Pressure", &["PA", "KiloPA", "MegaPA", "BAR", "ATM"]),
    ("Length", &["M", "CentiM", "MilliM", "MicroM", "NanoM"]),
    ("Mass", &["KiloGM", "GM", "MilliGM"]),
    ("Time", &["SEC", "MIN", "HR", "DAY"]),
    ("Voltage", &["V", "MilliV"]),
    ("ElectricCurrent", &["A", "MilliA"]),
    ("Power", &["W", "KiloW"]),
    ("Resistance", &["OHM"]),
    ("Irradiance", &["W-PER-M2"]),
    ("DimensionlessRatio", &["PERCENT", "UNITLESS"]),
];

/// Known QUDT unit local names and the quantity kinds they measure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitVocabulary {
    units: BTreeSet<String>,
    kinds: BTreeMap<String, BTreeSet<String>>,
}

impl UnitVocabulary {
    /// The built-in unit list.
    #[must_use]
    pub fn builtin() -> Self {
        let mut units = Self::default();
        for (kind, names) in BUILTIN_UNITS {
            for name in *names {
                units.insert(name, Some(*kind));
            }
        }
        units
    }

    /// Harvests every subject under the QUDT unit namespace from `graph`,
    /// with its `qudt:hasQuantityKind` values.
    #[must_use]
    pub fn from_graph(graph: &Graph) -> Self {
        let mut units = Self::default();
        for subject in graph.subjects() {
            let Some(local) = subject.as_iri().and_then(|i| i.strip_prefix(vocab::UNIT)) else {
                continue;
            };
            if local.is_empty() {
                continue;
            }
            units.insert(local, None);
            for kind in graph.objects(subject, vocab::QUDT_HAS_QUANTITY_KIND) {
                if let Term::Iri(iri) = kind {
                    let kind = iri.strip_prefix(vocab::QUANTITY_KIND).unwrap_or(iri.as_str());
                    units.insert(local, Some(kind));
                }
            }
        }
        units
    }

    /// Adds a unit, optionally under a quantity kind.
    pub fn insert(&mut self, unit: &str, kind: Option<&str>) {
        let unit = unit_local_name(unit).to_owned();
        if let Some(kind) = kind {
            self.kinds
                .entry(kind.to_owned())
                .or_default()
                .insert(unit.clone());
        }
        self.units.insert(unit);
    }

    /// Adds every unit of `other`.
    pub fn extend(&mut self, other: &UnitVocabulary) {
        self.units.extend(other.units.iter().cloned());
        for (kind, units) in &other.kinds {
            self.kinds
                .entry(kind.clone())
                .or_default()
                .extend(units.iter().cloned());
        }
    }

    /// Returns true if `unit` (local name, `unit:` CURIE or full IRI) is known.
    #[must_use]
    pub fn contains(&self, unit: &str) -> bool {
        self.units.contains(unit_local_name(unit))
    }

    /// Units recorded for a quantity kind (case-insensitive).
    #[must_use]
    pub fn units_of(&self, kind: &str) -> Option<&BTreeSet<String>> {
        self.kinds
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(kind))
            .map(|(_, units)| units)
    }

    /// Known quantity kind with this name, in its canonical spelling.
    #[must_use]
    pub fn kind(&self, kind: &str) -> Option<&str> {
        self.kinds
            .keys()
            .find(|k| k.eq_ignore_ascii_case(kind))
            .map(String::as_str)
    }

    /// Number of known units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Returns true when no unit is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Local name of a unit written as bare name, CURIE or IRI.
#[must_use]
pub fn unit_local_name(unit: &str) -> &str {
    let unit = unit.trim();
    if unit.contains("://") {
        return unit.rsplit(['/', '#']).next().unwrap_or(unit);
    }
    unit.rsplit_once(':').map_or(unit, |(_, local)| local)
}

/// What is known about a variable whose metadata is incomplete.
#[derive(Debug, Clone, Copy)]
pub struct FieldRequest<'a> {
    /// Column name.
    pub column: &'a str,
    /// Study stage already recorded, if any.
    pub study_stage: Option<&'a str>,
    /// Unit already recorded, if any.
    pub existing_unit: Option<&'a str>,
    /// Category already recorded, if any.
    pub existing_category: Option<&'a str>,
    /// Units an answer is validated against.
    pub valid_units: &'a UnitVocabulary,
}

/// Finalized fields for one variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedField {
    /// QUDT quantity kind local name.
    pub quantity_kind: Option<String>,
    /// QUDT unit local name.
    pub unit: Option<String>,
    /// Study stage, one of [`STUDY_STAGES`].
    pub study_stage: Option<String>,
    /// Whether the variable is a measure.
    pub is_measure: bool,
}

/// Supplies missing variable metadata.
pub trait FieldCompletion {
    /// Completes the fields of one variable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingMetadata`] when no valid value can be obtained.
    fn complete(&mut self, request: &FieldRequest<'_>) -> Result<CompletedField>;
}

/// A question/answer channel.
pub trait Prompt {
    /// Asks `question`; `None` means no more answers are available.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying channel fails.
    fn ask(&mut self, question: &str) -> Result<Option<String>>;
}

/// Answers from a fixed queue, recording every question asked.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedPrompt {
    /// Creates a prompt that replays `answers` in order.
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// Questions asked so far.
    #[must_use]
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    /// Answers not consumed yet.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        self.asked.push(question.to_owned());
        Ok(self.answers.pop_front())
    }
}

/// Retry-until-valid completion over a [`Prompt`].
#[derive(Debug)]
pub struct PromptCompletion<P> {
    prompt: P,
    max_attempts: usize,
}

impl<P: Prompt> PromptCompletion<P> {
    /// Wraps `prompt`, allowing five attempts per field.
    pub fn new(prompt: P) -> Self {
        Self {
            prompt,
            max_attempts: 5,
        }
    }

    /// Overrides the number of attempts per field.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Returns the wrapped prompt.
    pub fn into_inner(self) -> P {
        self.prompt
    }

    fn ask_until<T>(
        &mut self,
        column: &str,
        field: &'static str,
        question: &str,
        mut accept: impl FnMut(&str) -> Option<T>,
    ) -> Result<T> {
        for attempt in 1..=self.max_attempts {
            let Some(answer) = self.prompt.ask(question)? else { break };
            if let Some(value) = accept(answer.trim()) {
                return Ok(value);
            }
            tracing::warn!(column, field, attempt, answer = %answer.trim(), "rejected answer");
        }
        Err(Error::MissingMetadata {
            variable: column.to_owned(),
            field,
        })
    }
}

impl<P: Prompt> FieldCompletion for PromptCompletion<P> {
    fn complete(&mut self, request: &FieldRequest<'_>) -> Result<CompletedField> {
        let column = request.column;
        let units = request.valid_units;

        let quantity_kind = self.ask_until(
            column,
            "quantity kind",
            &format!("Quantity kind of '{column}'?"),
            |a| {
                if a.is_empty() {
                    return None;
                }
                if units.kinds.is_empty() {
                    return Some(a.to_owned());
                }
                units.kind(a).map(str::to_owned)
            },
        )?;

        let unit = match request.existing_unit.filter(|u| units.contains(u)) {
            Some(existing) => unit_local_name(existing).to_owned(),
            None => {
                let allowed = units.units_of(&quantity_kind);
                self.ask_until(column, "unit", &format!("Unit of '{column}'?"), |a| {
                    let local = unit_local_name(a);
                    let valid = match allowed {
                        Some(set) => set.contains(local),
                        None => units.contains(local),
                    };
                    valid.then(|| local.to_owned())
                })?
            }
        };

        let study_stage = match request
            .study_stage
            .or(request.existing_category)
            .and_then(canonical_stage)
        {
            Some(stage) => stage.to_owned(),
            None => self.ask_until(
                column,
                "study stage",
                &format!("Study stage of '{column}' ({})?", STUDY_STAGES.join(", ")),
                |a| canonical_stage(a).map(str::to_owned),
            )?,
        };

        let is_measure = self.ask_until(
            column,
            "measure flag",
            &format!("Is '{column}' a measured value? (y/n)"),
            parse_flag,
        )?;

        Ok(CompletedField {
            quantity_kind: Some(quantity_kind),
            unit: Some(unit),
            study_stage: Some(study_stage),
            is_measure,
        })
    }
}

/// Case-insensitive lookup in [`STUDY_STAGES`].
#[must_use]
pub fn canonical_stage(answer: &str) -> Option<&'static str> {
    STUDY_STAGES
        .iter()
        .copied()
        .find(|s| s.eq_ignore_ascii_case(answer.trim()))
}

/// Parses yes/no style answers.
#[must_use]
pub fn parse_flag(answer: &str) -> Option<bool> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => Some(true),
        "n" | "no" | "false" | "0" => Some(false),
        _ => None,
    }
}
