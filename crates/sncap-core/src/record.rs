//! Fixed ledger export layout and the record type built from it.

use serde::Serialize;

use crate::normalize::normalize;

/// Number of columns in a ledger export row.
pub const COLUMN_COUNT: usize = 36;

/// Label of the appended annotation column.
pub const ERROR_COLUMN: &str = "Erro";

/// A column of the ledger export, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Account,
    AccountDescription,
    PostingDate,
    DocumentDate,
    Journal,
    PostingNumber,
    EntryType,
    DocumentId,
    Description,
    Debit,
    Credit,
    Balance,
    Entity,
    EntityName,
    DebitCreditFlag,
    RevenueExpenseFlag,
    FinancingSource,
    Program,
    Measure,
    Project,
    Activity,
    FunctionalClassification,
    OrganizationalClassification,
    EconomicClassification,
    CostCentre,
    FiscalYear,
    Month,
    User,
    RegistrationDate,
    CommitmentNumber,
    AppropriationNumber,
    ObligationNumber,
    PaymentAuthorisationNumber,
    PaymentNumber,
    Notes,
    Status,
}

impl Field {
    /// All columns in export order.
    pub const ALL: [Field; COLUMN_COUNT] = [
        Field::Account,
        Field::AccountDescription,
        Field::PostingDate,
        Field::DocumentDate,
        Field::Journal,
        Field::PostingNumber,
        Field::EntryType,
        Field::DocumentId,
        Field::Description,
        Field::Debit,
        Field::Credit,
        Field::Balance,
        Field::Entity,
        Field::EntityName,
        Field::DebitCreditFlag,
        Field::RevenueExpenseFlag,
        Field::FinancingSource,
        Field::Program,
        Field::Measure,
        Field::Project,
        Field::Activity,
        Field::FunctionalClassification,
        Field::OrganizationalClassification,
        Field::EconomicClassification,
        Field::CostCentre,
        Field::FiscalYear,
        Field::Month,
        Field::User,
        Field::RegistrationDate,
        Field::CommitmentNumber,
        Field::AppropriationNumber,
        Field::ObligationNumber,
        Field::PaymentAuthorisationNumber,
        Field::PaymentNumber,
        Field::Notes,
        Field::Status,
    ];

    /// Zero-based column position.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Header label as written by the accounting system.
    pub fn label(self) -> &'static str {
        match self {
            Field::Account => "Conta",
            Field::AccountDescription => "Descrição Conta",
            Field::PostingDate => "Data Lançamento",
            Field::DocumentDate => "Data Documento",
            Field::Journal => "Diário",
            Field::PostingNumber => "Nº Lançamento",
            Field::EntryType => "Tipo Lançamento",
            Field::DocumentId => "Documento",
            Field::Description => "Descrição",
            Field::Debit => "Débito",
            Field::Credit => "Crédito",
            Field::Balance => "Saldo",
            Field::Entity => "Entidade",
            Field::EntityName => "Nome Entidade",
            Field::DebitCreditFlag => "D/C",
            Field::RevenueExpenseFlag => "R/D",
            Field::FinancingSource => "Fonte Financiamento",
            Field::Program => "Programa",
            Field::Measure => "Medida",
            Field::Project => "Projeto",
            Field::Activity => "Atividade",
            Field::FunctionalClassification => "Classificação Funcional",
            Field::OrganizationalClassification => "Classificação Orgânica",
            Field::EconomicClassification => "Classificação Económica",
            Field::CostCentre => "Centro Custo",
            Field::FiscalYear => "Ano",
            Field::Month => "Mês",
            Field::User => "Utilizador",
            Field::RegistrationDate => "Data Registo",
            Field::CommitmentNumber => "Nº Compromisso",
            Field::AppropriationNumber => "Nº Cabimento",
            Field::ObligationNumber => "Nº Obrigação",
            Field::PaymentAuthorisationNumber => "Nº Autorização Pagamento",
            Field::PaymentNumber => "Nº Pagamento",
            Field::Notes => "Observações",
            Field::Status => "Estado",
        }
    }
}

/// Header labels in export order.
pub fn header_labels() -> impl Iterator<Item = &'static str> {
    Field::ALL.iter().map(|field| field.label())
}

/// One data row of a ledger export.
///
/// Values are kept exactly as exported so the annotated output reproduces
/// the input; accessors return normalized views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerRecord {
    /// 1-based line number in the decoded input
    pub line: usize,
    values: Vec<String>,
}

impl LedgerRecord {
    /// Build a record from exactly [`COLUMN_COUNT`] raw values.
    ///
    /// Returns `None` when fewer values are given; extra values are dropped.
    pub fn from_values<I, S>(line: usize, values: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values
            .into_iter()
            .take(COLUMN_COUNT)
            .map(Into::into)
            .collect();
        if values.len() < COLUMN_COUNT {
            return None;
        }
        Some(Self { line, values })
    }

    /// Raw value as exported.
    pub fn raw(&self, field: Field) -> &str {
        self.values
            .get(field.index())
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Normalized value.
    pub fn get(&self, field: Field) -> &str {
        normalize(self.raw(field))
    }

    /// All raw values in export order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn account(&self) -> &str {
        self.get(Field::Account)
    }

    pub fn document_id(&self) -> &str {
        self.get(Field::DocumentId)
    }

    pub fn entry_type(&self) -> &str {
        self.get(Field::EntryType)
    }

    pub fn financing_source(&self) -> &str {
        self.get(Field::FinancingSource)
    }

    pub fn organizational_classification(&self) -> &str {
        self.get(Field::OrganizationalClassification)
    }

    /// Budget rubric: the account code after its first segment.
    pub fn rubric(&self) -> &str {
        rubric(self.account())
    }
}

/// Budget rubric of an account code (`0281.02.02.22.H0.00` -> `02.02.22.H0.00`).
///
/// Accounts without a dot have an empty rubric.
pub fn rubric(account: &str) -> &str {
    account
        .split_once('.')
        .map(|(_, rest)| rest)
        .unwrap_or("")
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Build a record with every column empty except the given ones.
    pub fn record_with(line: usize, fields: &[(Field, &str)]) -> LedgerRecord {
        let mut values = vec![String::new(); COLUMN_COUNT];
        for (field, value) in fields {
            values[field.index()] = (*value).to_string();
        }
        LedgerRecord::from_values(line, values).expect("full row")
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::record_with;
    use super::*;

    #[test]
    fn test_layout_is_complete() {
        assert_eq!(Field::ALL.len(), COLUMN_COUNT);
        for (i, field) in Field::ALL.iter().enumerate() {
            assert_eq!(field.index(), i);
        }
        assert_eq!(Field::Account.label(), "Conta");
        assert_eq!(Field::Status.index(), COLUMN_COUNT - 1);
    }

    #[test]
    fn test_short_row_rejected() {
        assert!(LedgerRecord::from_values(1, vec!["a"; COLUMN_COUNT - 1]).is_none());
    }

    #[test]
    fn test_extra_values_dropped() {
        let record = LedgerRecord::from_values(1, vec!["x"; COLUMN_COUNT + 2]).unwrap();
        assert_eq!(record.values().len(), COLUMN_COUNT);
    }

    #[test]
    fn test_accessors_normalize() {
        let record = record_with(
            4,
            &[
                (Field::FinancingSource, " '368 "),
                (Field::OrganizationalClassification, "'0102"),
            ],
        );
        assert_eq!(record.financing_source(), "368");
        assert_eq!(record.raw(Field::FinancingSource), " '368 ");
        assert_eq!(record.organizational_classification(), "0102");
    }

    #[test]
    fn test_rubric() {
        assert_eq!(rubric("0281.02.02.22.H0.00"), "02.02.22.H0.00");
        assert_eq!(rubric("0272"), "");
        let record = record_with(1, &[(Field::Account, "'0272.02.01")]);
        assert_eq!(record.rubric(), "02.01");
    }
}
