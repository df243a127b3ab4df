//! SNC-AP validation rules.
//!
//! [`RuleSet`] holds every code the rules compare against; [`RuleEvaluator`]
//! applies it. Per-record rules always all run, in a fixed order, so the
//! annotation of a record is deterministic. The rubric rule needs the other
//! records of the same document and runs once over the whole file.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SncapError};
use crate::record::{Field, LedgerRecord};
use crate::report::AnnotatedRecord;

/// Identifier of the rule that produced a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    FinancingSourceMissing,
    FinancingOrgMismatch,
    RevenueEntityFinancing,
    RevenueProgram,
    Measure,
    CentralOrgActivity,
    ProjectOrgActivity,
    FunctionalClassification,
    CommitmentFinancing,
    RubricMismatch,
}

impl RuleId {
    pub fn as_str(self) -> &'static str {
        match self {
            RuleId::FinancingSourceMissing => "financing_source_missing",
            RuleId::FinancingOrgMismatch => "financing_org_mismatch",
            RuleId::RevenueEntityFinancing => "revenue_entity_financing",
            RuleId::RevenueProgram => "revenue_program",
            RuleId::Measure => "measure",
            RuleId::CentralOrgActivity => "central_org_activity",
            RuleId::ProjectOrgActivity => "project_org_activity",
            RuleId::FunctionalClassification => "functional_classification",
            RuleId::CommitmentFinancing => "commitment_financing",
            RuleId::RubricMismatch => "rubric_mismatch",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rule failure on a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub rule: RuleId,
    pub message: String,
}

impl Violation {
    fn new(rule: RuleId, message: impl Into<String>) -> Self {
        Self {
            rule,
            message: message.into(),
        }
    }
}

/// Financing sources that require a given organizational classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingOrgGroup {
    pub organizational: String,
    pub sources: Vec<String>,
}

/// Reserved revenue entity and the financing source it must use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityFinancing {
    pub entity: String,
    pub financing_source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevenueRules {
    pub program: String,
    pub entities: Vec<EntityFinancing>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureRules {
    pub required: String,
    /// Financing sources for which the measure is not checked
    pub exempt_sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpenseRules {
    /// Organic code whose activity depends on whether a project is set
    pub central_org: String,
    /// Organic code that always needs a project
    pub project_org: String,
    /// Activity code meaning "no activity"
    pub no_activity: String,
    /// Activity code for central expenses without a project
    pub default_activity: String,
    pub functional_classification: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitmentRules {
    /// Entry type marking a commitment
    pub entry_type: String,
    pub financing_source: String,
    /// Account prefixes of the debit side of a commitment
    pub debit_prefixes: Vec<String>,
    /// Account prefix of the credit side of a commitment
    pub credit_prefix: String,
}

/// The full rule table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    pub revenue_flag: String,
    pub expense_flag: String,
    pub financing_org: Vec<FinancingOrgGroup>,
    pub revenue: RevenueRules,
    pub measure: MeasureRules,
    pub expense: ExpenseRules,
    pub commitment: CommitmentRules,
}

fn codes(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

impl Default for RevenueRules {
    fn default() -> Self {
        Self {
            program: "011".to_string(),
            entities: vec![
                EntityFinancing {
                    entity: "500000001".to_string(),
                    financing_source: "511".to_string(),
                },
                EntityFinancing {
                    entity: "500000002".to_string(),
                    financing_source: "513".to_string(),
                },
            ],
        }
    }
}

impl Default for MeasureRules {
    fn default() -> Self {
        Self {
            required: "022".to_string(),
            exempt_sources: codes(&["368", "31H"]),
        }
    }
}

impl Default for ExpenseRules {
    fn default() -> Self {
        Self {
            central_org: "0101".to_string(),
            project_org: "0102".to_string(),
            no_activity: "0000".to_string(),
            default_activity: "0001".to_string(),
            functional_classification: "0111".to_string(),
        }
    }
}

impl Default for CommitmentRules {
    fn default() -> Self {
        Self {
            entry_type: "CO".to_string(),
            financing_source: "511".to_string(),
            debit_prefixes: codes(&["0281", "0282"]),
            credit_prefix: "0272".to_string(),
        }
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            revenue_flag: "R".to_string(),
            expense_flag: "D".to_string(),
            financing_org: vec![
                FinancingOrgGroup {
                    organizational: "0102".to_string(),
                    sources: codes(&["368", "31H", "483", "488", "361", "415"]),
                },
                FinancingOrgGroup {
                    organizational: "0103".to_string(),
                    sources: codes(&["511", "513", "521", "522", "541", "724", "721"]),
                },
            ],
            revenue: RevenueRules::default(),
            measure: MeasureRules::default(),
            expense: ExpenseRules::default(),
            commitment: CommitmentRules::default(),
        }
    }
}

impl RuleSet {
    /// Organizational classification required for a financing source.
    pub fn required_org(&self, financing_source: &str) -> Option<&str> {
        self.financing_org
            .iter()
            .find(|group| group.sources.iter().any(|s| s == financing_source))
            .map(|group| group.organizational.as_str())
    }

    /// Reject tables that would make the evaluator ambiguous.
    pub fn validate(&self) -> Result<()> {
        let mut seen: HashMap<&str, &str> = HashMap::new();
        for group in &self.financing_org {
            for source in &group.sources {
                let organizational = group.organizational.as_str();
                if let Some(previous) = seen.insert(source.as_str(), organizational) {
                    if previous != organizational {
                        return Err(SncapError::Config(format!(
                            "financing source {} mapped to both {} and {}",
                            source, previous, organizational
                        )));
                    }
                }
            }
        }
        if self.commitment.debit_prefixes.iter().any(|p| p.is_empty())
            || self.commitment.credit_prefix.is_empty()
        {
            return Err(SncapError::Config(
                "commitment account prefixes must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Applies a [`RuleSet`] to ledger records.
#[derive(Debug, Clone, Copy)]
pub struct RuleEvaluator<'a> {
    rules: &'a RuleSet,
}

impl<'a> RuleEvaluator<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Per-record rules, in evaluation order.
    pub fn evaluate(&self, record: &LedgerRecord) -> Vec<Violation> {
        let mut out = Vec::new();
        self.check_financing_source(record, &mut out);
        self.check_financing_org(record, &mut out);

        let flag = record.get(Field::RevenueExpenseFlag);
        if flag == self.rules.revenue_flag {
            self.check_revenue(record, &mut out);
        } else if flag == self.rules.expense_flag {
            self.check_expense(record, &mut out);
        }
        out
    }

    fn check_financing_source(&self, record: &LedgerRecord, out: &mut Vec<Violation>) {
        if record.financing_source().is_empty() {
            out.push(Violation::new(
                RuleId::FinancingSourceMissing,
                "Fonte de financiamento não preenchida",
            ));
        }
    }

    fn check_financing_org(&self, record: &LedgerRecord, out: &mut Vec<Violation>) {
        let source = record.financing_source();
        if let Some(required) = self.rules.required_org(source) {
            if record.organizational_classification() != required {
                out.push(Violation::new(
                    RuleId::FinancingOrgMismatch,
                    format!(
                        "Fonte de financiamento {} exige classificação orgânica {}",
                        source, required
                    ),
                ));
            }
        }
    }

    fn check_revenue(&self, record: &LedgerRecord, out: &mut Vec<Violation>) {
        let revenue = &self.rules.revenue;
        let entity = record.get(Field::Entity);
        let source = record.financing_source();
        for reserved in revenue.entities.iter().filter(|e| e.entity == entity) {
            if source != reserved.financing_source {
                out.push(Violation::new(
                    RuleId::RevenueEntityFinancing,
                    format!(
                        "Entidade {} exige fonte de financiamento {}",
                        reserved.entity, reserved.financing_source
                    ),
                ));
            }
        }

        if record.get(Field::Program) != revenue.program {
            out.push(Violation::new(
                RuleId::RevenueProgram,
                format!("Receita: programa deve ser {}", revenue.program),
            ));
        }

        self.check_measure(record, out);
    }

    fn check_measure(&self, record: &LedgerRecord, out: &mut Vec<Violation>) {
        let measure = &self.rules.measure;
        let source = record.financing_source();
        if measure.exempt_sources.iter().any(|s| s == source) {
            return;
        }
        if record.get(Field::Measure) != measure.required {
            out.push(Violation::new(
                RuleId::Measure,
                format!("Medida deve ser {}", measure.required),
            ));
        }
    }

    fn check_expense(&self, record: &LedgerRecord, out: &mut Vec<Violation>) {
        let expense = &self.rules.expense;
        self.check_measure(record, out);

        let org = record.organizational_classification();
        let project = record.get(Field::Project);
        let activity = record.get(Field::Activity);
        if org == expense.central_org {
            if !project.is_empty() && activity != expense.no_activity {
                out.push(Violation::new(
                    RuleId::CentralOrgActivity,
                    format!(
                        "Orgânica {} com projeto: atividade deve ser {}",
                        org, expense.no_activity
                    ),
                ));
            } else if project.is_empty() && activity != expense.default_activity {
                out.push(Violation::new(
                    RuleId::CentralOrgActivity,
                    format!(
                        "Orgânica {} sem projeto: atividade deve ser {}",
                        org, expense.default_activity
                    ),
                ));
            }
        }
        if org == expense.project_org && (activity != expense.no_activity || project.is_empty()) {
            out.push(Violation::new(
                RuleId::ProjectOrgActivity,
                format!(
                    "Orgânica {}: atividade deve ser {} e projeto preenchido",
                    org, expense.no_activity
                ),
            ));
        }

        if record.get(Field::FunctionalClassification) != expense.functional_classification {
            out.push(Violation::new(
                RuleId::FunctionalClassification,
                format!(
                    "Classificação funcional deve ser {}",
                    expense.functional_classification
                ),
            ));
        }

        let commitment = &self.rules.commitment;
        if record.entry_type() == commitment.entry_type
            && record.financing_source() != commitment.financing_source
        {
            out.push(Violation::new(
                RuleId::CommitmentFinancing,
                format!(
                    "Lançamentos {} exigem fonte de financiamento {}",
                    commitment.entry_type, commitment.financing_source
                ),
            ));
        }
    }

    fn is_commitment(&self, record: &LedgerRecord) -> bool {
        record.entry_type() == self.rules.commitment.entry_type && !record.document_id().is_empty()
    }

    /// Credit postings of a commitment whose rubric has no debit posting in
    /// the same document.
    ///
    /// Returns `(record index, violation)` pairs in record order.
    pub fn check_documents(&self, records: &[LedgerRecord]) -> Vec<(usize, Violation)> {
        let commitment = &self.rules.commitment;

        let mut debit_rubrics: HashMap<&str, HashSet<&str>> = HashMap::new();
        for record in records.iter().filter(|r| self.is_commitment(r)) {
            let account = record.account();
            if commitment
                .debit_prefixes
                .iter()
                .any(|prefix| account.starts_with(prefix.as_str()))
            {
                debit_rubrics
                    .entry(record.document_id())
                    .or_default()
                    .insert(record.rubric());
            }
        }

        let mut out = Vec::new();
        for (index, record) in records.iter().enumerate() {
            if !self.is_commitment(record)
                || !record
                    .account()
                    .starts_with(commitment.credit_prefix.as_str())
            {
                continue;
            }
            let document = record.document_id();
            let rubric = record.rubric();
            let matched = debit_rubrics
                .get(document)
                .is_some_and(|rubrics| rubrics.contains(rubric));
            if !matched {
                out.push((
                    index,
                    Violation::new(
                        RuleId::RubricMismatch,
                        format!(
                            "Documento {}: rubrica {} a crédito sem correspondência a débito",
                            document, rubric
                        ),
                    ),
                ));
            }
        }
        out
    }
}

/// Run every rule over `records`, keeping input order.
pub fn validate(records: Vec<LedgerRecord>, rules: &RuleSet) -> Vec<AnnotatedRecord> {
    let evaluator = RuleEvaluator::new(rules);
    let mut document_violations: HashMap<usize, Vec<Violation>> = HashMap::new();
    for (index, violation) in evaluator.check_documents(&records) {
        document_violations.entry(index).or_default().push(violation);
    }

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let mut violations = evaluator.evaluate(&record);
            if let Some(extra) = document_violations.remove(&index) {
                violations.extend(extra);
            }
            AnnotatedRecord::new(record, violations)
        })
        .collect()
}
