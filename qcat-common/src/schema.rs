//! Annotation sheet schema
//!
//! Column identities, the positional layouts of the exported sheets, and the
//! standardized criterion hierarchy each sheet version annotates against.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// A column of the annotation sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Key,
    Annotator,
    DateAnnotated,
    DoubleCheckedBy,
    DateDoubleChecked,
    AnnotationComments,
    Exclude,
    TimeTaken,
    PubVenue,
    PubAuthors,
    PubYear,
    PubUrl,
    SystemLanguage,
    SystemInput,
    SystemOutput,
    SystemTask,
    SystemApplicationDomain,
    OpResponseValues,
    OpInstrumentSize,
    OpInstrumentType,
    OpDataType,
    OpForm,
    OpQuestionPromptVerbatim,
    OpQuestionPromptParaphrase,
    OpStatistics,
    CriterionVerbatim,
    CriterionDefinitionVerbatim,
    CriterionParaphrase,
    CriterionDefinitionParaphrase,
}

impl Column {
    /// Every known column, in declaration order
    pub const ALL: [Column; 29] = [
        Column::Key,
        Column::Annotator,
        Column::DateAnnotated,
        Column::DoubleCheckedBy,
        Column::DateDoubleChecked,
        Column::AnnotationComments,
        Column::Exclude,
        Column::TimeTaken,
        Column::PubVenue,
        Column::PubAuthors,
        Column::PubYear,
        Column::PubUrl,
        Column::SystemLanguage,
        Column::SystemInput,
        Column::SystemOutput,
        Column::SystemTask,
        Column::SystemApplicationDomain,
        Column::OpResponseValues,
        Column::OpInstrumentSize,
        Column::OpInstrumentType,
        Column::OpDataType,
        Column::OpForm,
        Column::OpQuestionPromptVerbatim,
        Column::OpQuestionPromptParaphrase,
        Column::OpStatistics,
        Column::CriterionVerbatim,
        Column::CriterionDefinitionVerbatim,
        Column::CriterionParaphrase,
        Column::CriterionDefinitionParaphrase,
    ];

    /// Snake-case column name as used in output file names
    pub fn as_str(&self) -> &'static str {
        match self {
            Column::Key => "key",
            Column::Annotator => "annotator",
            Column::DateAnnotated => "date_annotated",
            Column::DoubleCheckedBy => "double_checked_by",
            Column::DateDoubleChecked => "date_double_checked",
            Column::AnnotationComments => "annotation_comments",
            Column::Exclude => "exclude",
            Column::TimeTaken => "time_taken",
            Column::PubVenue => "pub_venue",
            Column::PubAuthors => "pub_authors",
            Column::PubYear => "pub_year",
            Column::PubUrl => "pub_url",
            Column::SystemLanguage => "system_language",
            Column::SystemInput => "system_input",
            Column::SystemOutput => "system_output",
            Column::SystemTask => "system_task",
            Column::SystemApplicationDomain => "system_application_domain",
            Column::OpResponseValues => "op_response_values",
            Column::OpInstrumentSize => "op_instrument_size",
            Column::OpInstrumentType => "op_instrument_type",
            Column::OpDataType => "op_data_type",
            Column::OpForm => "op_form",
            Column::OpQuestionPromptVerbatim => "op_question_prompt_verbatim",
            Column::OpQuestionPromptParaphrase => "op_question_prompt_paraphrase",
            Column::OpStatistics => "op_statistics",
            Column::CriterionVerbatim => "criterion_verbatim",
            Column::CriterionDefinitionVerbatim => "criterion_definition_verbatim",
            Column::CriterionParaphrase => "criterion_paraphrase",
            Column::CriterionDefinitionParaphrase => "criterion_definition_paraphrase",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Column {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Column::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown column: {}", s)))
    }
}

const V1_COLUMNS: &[Column] = &[
    Column::Key,
    Column::Annotator,
    Column::DateAnnotated,
    Column::DoubleCheckedBy,
    Column::DateDoubleChecked,
    Column::AnnotationComments,
    Column::Exclude,
    Column::TimeTaken,
    Column::PubVenue,
    Column::PubAuthors,
    Column::PubYear,
    Column::PubUrl,
    Column::SystemLanguage,
    Column::SystemInput,
    Column::SystemOutput,
    Column::SystemTask,
    Column::SystemApplicationDomain,
    Column::CriterionVerbatim,
    Column::CriterionDefinitionVerbatim,
    Column::CriterionParaphrase,
    Column::CriterionDefinitionParaphrase,
    Column::OpForm,
    Column::OpQuestionPromptVerbatim,
    Column::OpQuestionPromptParaphrase,
    Column::OpDataType,
    Column::OpInstrumentType,
    Column::OpInstrumentSize,
    Column::OpResponseValues,
    Column::OpStatistics,
];

const V2_COLUMNS: &[Column] = &[
    Column::Key,
    Column::Annotator,
    Column::DateAnnotated,
    Column::AnnotationComments,
    Column::Exclude,
    Column::TimeTaken,
    Column::PubVenue,
    Column::PubAuthors,
    Column::PubYear,
    Column::PubUrl,
    Column::SystemLanguage,
    Column::SystemInput,
    Column::SystemOutput,
    Column::SystemTask,
    Column::OpResponseValues,
    Column::OpInstrumentSize,
    Column::OpInstrumentType,
    Column::OpDataType,
    Column::OpForm,
    Column::OpQuestionPromptVerbatim,
    Column::OpQuestionPromptParaphrase,
    Column::OpStatistics,
    Column::CriterionVerbatim,
    Column::CriterionDefinitionVerbatim,
    Column::CriterionParaphrase,
    Column::CriterionDefinitionParaphrase,
];

/// Placeholder for a `<column>_evidence_found` cell beside a data column
const EVIDENCE: Option<Column> = None;

/// Evidence-round metadata: the V2 metadata with evidence bookkeeping
/// columns after the annotation date
const V2_EVIDENCE_METADATA: &[Option<Column>] = &[
    Some(Column::Key),
    Some(Column::Annotator),
    Some(Column::DateAnnotated),
    None, // evidence_collector
    None, // date_evidenced
    None, // time_taken_evidence
    None, // evidence_collector_comments
    Some(Column::AnnotationComments),
    Some(Column::Exclude),
    Some(Column::TimeTaken),
    Some(Column::PubVenue),
    Some(Column::PubAuthors),
    Some(Column::PubYear),
    Some(Column::PubUrl),
];

const V2EC_DATA: &[Option<Column>] = &[
    Some(Column::SystemLanguage),
    EVIDENCE,
    Some(Column::SystemInput),
    EVIDENCE,
    Some(Column::SystemOutput),
    EVIDENCE,
    Some(Column::SystemTask),
    EVIDENCE,
    Some(Column::OpResponseValues),
    EVIDENCE,
    Some(Column::OpInstrumentSize),
    EVIDENCE,
    Some(Column::OpInstrumentType),
    EVIDENCE,
    Some(Column::OpDataType),
    EVIDENCE,
    Some(Column::OpForm),
    EVIDENCE,
    Some(Column::OpQuestionPromptVerbatim),
    EVIDENCE,
    Some(Column::OpQuestionPromptParaphrase),
    EVIDENCE,
    Some(Column::OpStatistics),
    EVIDENCE,
    Some(Column::CriterionVerbatim),
    EVIDENCE,
    Some(Column::CriterionDefinitionVerbatim),
    EVIDENCE,
    Some(Column::CriterionParaphrase),
    Some(Column::CriterionDefinitionParaphrase),
];

const V2EA_DATA: &[Option<Column>] = &[
    Some(Column::SystemLanguage),
    EVIDENCE,
    Some(Column::SystemInput),
    EVIDENCE,
    Some(Column::SystemOutput),
    EVIDENCE,
    Some(Column::SystemTask),
    EVIDENCE,
    None, // system_evidence_found
    Some(Column::OpResponseValues),
    EVIDENCE,
    Some(Column::OpInstrumentSize),
    EVIDENCE,
    Some(Column::OpInstrumentType),
    EVIDENCE,
    Some(Column::OpDataType),
    EVIDENCE,
    None, // operationalisation_evidence_found
    Some(Column::OpForm),
    EVIDENCE,
    Some(Column::OpQuestionPromptVerbatim),
    EVIDENCE,
    Some(Column::OpQuestionPromptParaphrase),
    EVIDENCE,
    Some(Column::OpStatistics),
    EVIDENCE,
    Some(Column::CriterionVerbatim),
    EVIDENCE,
    Some(Column::CriterionDefinitionVerbatim),
    EVIDENCE,
    Some(Column::CriterionParaphrase),
    Some(Column::CriterionDefinitionParaphrase),
    None, // criterion_evidence_found
];

const CLOSED_CLASS_COLUMNS: &[Column] = &[
    Column::SystemInput,
    Column::SystemOutput,
    Column::SystemTask,
    Column::CriterionParaphrase,
    Column::OpForm,
    Column::OpDataType,
    Column::OpInstrumentType,
];

const V1_OPEN_CLASS_COLUMNS: &[Column] = &[
    Column::SystemApplicationDomain,
    Column::CriterionVerbatim,
    Column::CriterionDefinitionVerbatim,
    Column::CriterionDefinitionParaphrase,
    Column::OpQuestionPromptVerbatim,
    Column::OpQuestionPromptParaphrase,
    Column::OpInstrumentSize,
    Column::OpResponseValues,
    Column::OpStatistics,
];

const V2_OPEN_CLASS_COLUMNS: &[Column] = &[
    Column::CriterionVerbatim,
    Column::CriterionDefinitionVerbatim,
    Column::CriterionDefinitionParaphrase,
    Column::OpQuestionPromptVerbatim,
    Column::OpQuestionPromptParaphrase,
    Column::OpInstrumentSize,
    Column::OpResponseValues,
    Column::OpStatistics,
];

/// Top-level criterion group with its member criteria
pub type CriterionGroup = (&'static str, &'static [&'static str]);

const V1_HIERARCHY: &[CriterionGroup] = &[
    (
        "Quantitative Criteria",
        &[
            "Quantitative Criteria",
            "Input Surface Form Retention",
            "Input Content Retention",
        ],
    ),
    (
        "Quality of Surface Form",
        &[
            "Quality of Surface Form",
            "Correctness of Surface Form",
            "Grammaticality",
            "Spelling Accuracy",
            "Quality of Expression ('well-written')",
            "Speech Quality",
            "Aesthetic Quality of Surface Form",
            "Appropriateness of form given context",
        ],
    ),
    (
        "Quality of Content",
        &[
            "Quality of Content",
            "Correctness of Content",
            "Correctness relative to input",
            "Correctness relative to external reference",
            "Answerability from input",
            "Adequacy/Appropriateness",
            "Adequacy",
            "Adequacy Precision",
            "Adequacy Recall",
            "Appropriateness given context",
            "Informativeness",
            "Information - too much/not enough",
        ],
    ),
    (
        "Quality of text as a whole",
        &[
            "Quality of text as a whole",
            "Coherence",
            "Cohesion",
            "Wellorderedness",
            "Referent Resolvability",
            "Complexity",
            "Complexity/Simplicity of Form",
            "Complexity/Simplicity of Content",
            "Technicality/requires subject expertise",
            "Naturalness",
            "Naturalness (likelihood in context/situation)",
            "Naturalness (form)",
            "Naturalness (content)",
            "Conversationality",
            "Ease of Communication",
            "Readability",
            "Fluency",
            "Clarity",
            "Understandability",
            "Nonredundancy",
            "Nonredundancy (form)",
            "Nonredundancy (content)",
            "Vagueness/Specificity",
            "Vagueness/Specificity (form)",
            "Vagueness/Specificity (content)",
            "Variedness",
            "Variedness (form)",
            "Variedness (content)",
            "Originality",
            "Originality (form)",
            "Originality (content)",
            "Intended Property",
            "Detectability of Text Property",
        ],
    ),
    (
        "Extralinguistic Quality",
        &[
            "Extralinguistic Quality",
            "Criteria related to Listener/Reader",
            "Effect on listener",
            "Inferrability of Speaker Stance",
            "Inferrability of Speaker Trait",
            "Learnability",
            "Visualisability",
            "Humanlikeness",
            "Humanlikeness (form)",
            "Humanlikeness (content)",
            "Usefulness (nonspecific)",
            "Usefulness for task / information need",
            "Criteria related to system",
            "User Satisfaction",
            "Usability",
        ],
    ),
];

const V2_HIERARCHY: &[CriterionGroup] = &[
    (
        "Correctness of outputs",
        &[
            "Correctness of outputs",
            "Correctness of outputs in their own right",
            "Correctness of outputs in their own right (form)",
            "Grammaticality",
            "Spelling accuracy",
            "Correctness of outputs in their own right (content)",
            "Correctness of outputs in their own right (both form and content)",
            "Correctness of outputs relative to input",
            "Correctness of outputs relative to input (form)",
            "Correctness of outputs relative to input (content)",
            "Correctness of outputs relative to input (both form and content)",
            "Correctness of outputs relative to external frame of reference",
            "Correctness of outputs relative to external frame of reference (form)",
            "Correctness of outputs relative to external frame of reference (content)",
            "Factual truth",
            "Correctness of outputs relative to external frame of reference (both form and content)",
        ],
    ),
    (
        "Goodness of outputs (excluding correctness)",
        &[
            "Goodness of outputs (excluding correctness)",
            "Goodness of outputs in their own right",
            "Goodness of outputs in their own right (form)",
            "Speech quality",
            "Nonredundancy (form)",
            "Goodness of outputs in their own right (content)",
            "Nonredundancy (content)",
            "Information content of outputs",
            "Coherence",
            "Wellorderedness",
            "Cohesion",
            "Goodness of outputs in their own right (both form and content)",
            "Readability",
            "Fluency",
            "Understandability",
            "Clarity",
            "Nonredundancy (both form and content)",
            "Goodness of outputs relative to input",
            "Goodness of outputs relative to input (form)",
            "Goodness of outputs relative to input (content)",
            "Answerability",
            "Goodness of outputs relative to input (both form and content)",
            "Goodness of outputs relative to external frame of reference",
            "Goodness of outputs relative to linguistic context in which they are read/heard",
            "Naturalness",
            "Naturalness (form)",
            "Naturalness (content)",
            "Naturalness (both form and content)",
            "Appropriateness",
            "Appropriateness (form)",
            "Appropriateness (content)",
            "Appropriateness (both form and content)",
            "Goodness of outputs relative to how humans use language",
            "Humanlikeness",
            "Humanlikeness (form)",
            "Humanlikeness (content)",
            "Humanlikeness (both form and content)",
            "Goodness of outputs relative to system use",
            "Goodness as system explanation",
            "Usability",
            "User satisfaction",
            "Ease of communication",
            "Usefulness (nonspecific)",
            "Usefulness for task/information need",
            "Goodness of outputs relative to grounding",
            "Referent resolvability",
        ],
    ),
    (
        "Feature-type criteria",
        &[
            "Feature-type criteria",
            "Feature-type criteria assessed looking at outputs in their own right",
            "Text Property [PROPERTY]",
            "Text Property [Complexity/simplicity]",
            "Text Property [Complexity/simplicity (form)]",
            "Text Property [Complexity/simplicity (content)]",
            "Text Property [Complexity/simplicity (both form and content)]",
            "Feature-type criteria assessed looking at outputs and inputs",
            "Detectability of controlled feature [PROPERTY]",
            "Feature-type criteria assessed looking at outputs and external frame of reference",
            "Effect on reader/listener [EFFECT]",
            "Inferrability of speaker/author stance [OBJECT]",
            "Inferrability of speaker/author trait [TRAIT]",
        ],
    ),
];

/// Positional layout of an exported annotation sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetScheme {
    /// First agreement round: double-check metadata, application domain
    V1,
    /// Final corpus layout
    #[default]
    V2,
    /// Evidence round: V2 columns, each data column but the last two
    /// followed by its `*_evidence_found` cell
    V2ec,
    /// Evidence round with extra system, operationalisation and criterion
    /// evidence cells
    V2ea,
}

impl SheetScheme {
    /// Columns the sheet carries, in sheet order
    ///
    /// For the evidence rounds this skips the evidence cells; use
    /// [`SheetScheme::positions`] to address cells.
    pub fn columns(&self) -> &'static [Column] {
        match self {
            SheetScheme::V1 => V1_COLUMNS,
            SheetScheme::V2 | SheetScheme::V2ec | SheetScheme::V2ea => V2_COLUMNS,
        }
    }

    /// `(cell index, column)` for every column the sheet carries
    pub fn positions(&self) -> Vec<(usize, Column)> {
        let data = match self {
            SheetScheme::V1 | SheetScheme::V2 => {
                return self.columns().iter().copied().enumerate().collect();
            }
            SheetScheme::V2ec => V2EC_DATA,
            SheetScheme::V2ea => V2EA_DATA,
        };
        V2_EVIDENCE_METADATA
            .iter()
            .chain(data)
            .enumerate()
            .filter_map(|(i, column)| column.map(|c| (i, c)))
            .collect()
    }

    /// Number of cells in a full sheet row
    pub fn width(&self) -> usize {
        match self {
            SheetScheme::V1 | SheetScheme::V2 => self.columns().len(),
            SheetScheme::V2ec => V2_EVIDENCE_METADATA.len() + V2EC_DATA.len(),
            SheetScheme::V2ea => V2_EVIDENCE_METADATA.len() + V2EA_DATA.len(),
        }
    }

    /// Columns filled from a fixed label list
    pub fn closed_class_columns(&self) -> &'static [Column] {
        CLOSED_CLASS_COLUMNS
    }

    /// Free-text columns
    pub fn open_class_columns(&self) -> &'static [Column] {
        match self {
            SheetScheme::V1 => V1_OPEN_CLASS_COLUMNS,
            SheetScheme::V2 | SheetScheme::V2ec | SheetScheme::V2ea => V2_OPEN_CLASS_COLUMNS,
        }
    }

    /// Standardized criterion taxonomy the sheet annotates against
    pub fn hierarchy(&self) -> &'static [CriterionGroup] {
        match self {
            SheetScheme::V1 => V1_HIERARCHY,
            SheetScheme::V2 | SheetScheme::V2ec | SheetScheme::V2ea => V2_HIERARCHY,
        }
    }

    /// Top-level group of a standardized criterion
    ///
    /// Matching ignores case, hyphens and dots, so labels that went through
    /// [`crate::text::strip_numbering`] still resolve.
    pub fn parent_criterion(&self, label: &str) -> Option<&'static str> {
        let label = fold_label(label);
        self.hierarchy()
            .iter()
            .find(|(_, members)| members.iter().any(|m| fold_label(m) == label))
            .map(|(group, _)| *group)
    }
}

fn fold_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| *c != '-' && *c != '.')
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl FromStr for SheetScheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v1" => Ok(SheetScheme::V1),
            "v2" => Ok(SheetScheme::V2),
            "v2ec" => Ok(SheetScheme::V2ec),
            "v2ea" => Ok(SheetScheme::V2ea),
            other => Err(Error::InvalidInput(format!("Unknown sheet scheme: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_round_trip_names() {
        for column in Column::ALL {
            assert_eq!(column.as_str().parse::<Column>().unwrap(), column);
        }
        assert!("no_such_column".parse::<Column>().is_err());
    }

    #[test]
    fn test_v2_layout_matches_corpus_sheet() {
        let columns = SheetScheme::V2.columns();
        assert_eq!(columns.len(), 26);
        assert_eq!(columns[0], Column::Key);
        assert_eq!(columns[8], Column::PubYear);
        assert_eq!(columns[25], Column::CriterionDefinitionParaphrase);
        assert!(!columns.contains(&Column::SystemApplicationDomain));
    }

    #[test]
    fn test_v1_layout_has_double_check_metadata() {
        let columns = SheetScheme::V1.columns();
        assert_eq!(columns.len(), 29);
        assert_eq!(columns[3], Column::DoubleCheckedBy);
        assert!(SheetScheme::V1
            .open_class_columns()
            .contains(&Column::SystemApplicationDomain));
    }

    #[test]
    fn test_evidence_layouts_skip_evidence_cells() {
        let ec = SheetScheme::V2ec.positions();
        assert_eq!(SheetScheme::V2ec.width(), 44);
        assert_eq!(ec.len(), 26);
        assert_eq!(ec[3], (7, Column::AnnotationComments));
        assert_eq!(ec[10], (14, Column::SystemLanguage));
        assert_eq!(ec[11], (16, Column::SystemInput));
        assert_eq!(ec[24], (42, Column::CriterionParaphrase));
        assert_eq!(ec[25], (43, Column::CriterionDefinitionParaphrase));

        let ea = SheetScheme::V2ea.positions();
        assert_eq!(SheetScheme::V2ea.width(), 47);
        assert_eq!(ea.len(), 26);
        // system_evidence_found sits after system_task's evidence cell
        assert_eq!(ea[13], (20, Column::SystemTask));
        assert_eq!(ea[14], (23, Column::OpResponseValues));
        // operationalisation_evidence_found follows op_data_type's evidence
        assert_eq!(ea[17], (29, Column::OpDataType));
        assert_eq!(ea[18], (32, Column::OpForm));
        assert_eq!(ea[25], (45, Column::CriterionDefinitionParaphrase));

        let v2: Vec<Column> = SheetScheme::V2.positions().into_iter().map(|(_, c)| c).collect();
        let ec: Vec<Column> = ec.into_iter().map(|(_, c)| c).collect();
        assert_eq!(v2, ec);
        assert_eq!(SheetScheme::V2ea.hierarchy(), SheetScheme::V2.hierarchy());
    }

    #[test]
    fn test_parent_criterion_lookup() {
        assert_eq!(
            SheetScheme::V2.parent_criterion("fluency"),
            Some("Goodness of outputs (excluding correctness)")
        );
        assert_eq!(
            SheetScheme::V2.parent_criterion("Grammaticality"),
            Some("Correctness of outputs")
        );
        assert_eq!(
            SheetScheme::V1.parent_criterion("Fluency"),
            Some("Quality of text as a whole")
        );
        assert_eq!(SheetScheme::V2.parent_criterion("made up"), None);
    }

    #[test]
    fn test_parent_criterion_ignores_hyphens() {
        let scheme = SheetScheme::V2;
        assert_eq!(
            scheme.parent_criterion("Featuretype criteria"),
            Some("Feature-type criteria")
        );
        assert_eq!(
            SheetScheme::V1.parent_criterion("quality of expression ('wellwritten')"),
            Some("Quality of Surface Form")
        );
    }

    #[test]
    fn test_feature_type_members_are_distinct() {
        // Both complexity and the outputs-and-inputs group label must resolve
        let scheme = SheetScheme::V2;
        assert_eq!(
            scheme.parent_criterion("Feature-type criteria assessed looking at outputs and inputs"),
            Some("Feature-type criteria")
        );
        assert_eq!(
            scheme.parent_criterion("Text Property [Complexity/simplicity (both form and content)]"),
            Some("Feature-type criteria")
        );
    }

    #[test]
    fn test_scheme_from_str() {
        assert_eq!("V1".parse::<SheetScheme>().unwrap(), SheetScheme::V1);
        assert_eq!("v2".parse::<SheetScheme>().unwrap(), SheetScheme::V2);
        assert_eq!("V2EC".parse::<SheetScheme>().unwrap(), SheetScheme::V2ec);
        assert_eq!("v2ea".parse::<SheetScheme>().unwrap(), SheetScheme::V2ea);
        assert!("v3".parse::<SheetScheme>().is_err());
    }
}
