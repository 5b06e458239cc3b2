use serde::Serialize;

/// Base recorded for deleted positions.
pub const DELETION_MARKER: char = 'd';
/// Allele symbol VCF uses for a spanning deletion.
pub const SPANNING_DELETION: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VariantKind {
    Substitution,
    Heteroplasmy,
    Deletion,
    Insertion,
}

/// One allele of a heteroplasmic site together with its fraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlleleLevel {
    pub allele: char,
    pub level: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeteroplasmyCall {
    /// Non-reference allele (allele 1 when neither allele is the reference).
    pub base: char,
    /// Non-reference allele frequency as reported by the caller.
    pub level: f64,
    pub major: AlleleLevel,
    pub minor: AlleleLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum VariantCall {
    Substitution { base: char },
    Heteroplasmy(HeteroplasmyCall),
    Deletion,
    Insertion { sequence: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variant {
    pub position: u32,
    pub reference: char,
    pub coverage: Option<u32>,
    pub call: VariantCall,
}

impl Variant {
    pub fn substitution(position: u32, reference: char, base: char) -> Self {
        Self {
            position,
            reference,
            coverage: None,
            call: VariantCall::Substitution { base },
        }
    }

    pub fn deletion(position: u32, reference: char) -> Self {
        Self {
            position,
            reference,
            coverage: None,
            call: VariantCall::Deletion,
        }
    }

    pub fn insertion(position: u32, reference: char, sequence: impl Into<String>) -> Self {
        Self {
            position,
            reference,
            coverage: None,
            call: VariantCall::Insertion {
                sequence: sequence.into(),
            },
        }
    }

    pub fn heteroplasmy(position: u32, reference: char, call: HeteroplasmyCall) -> Self {
        Self {
            position,
            reference,
            coverage: None,
            call: VariantCall::Heteroplasmy(call),
        }
    }

    pub fn with_coverage(mut self, coverage: Option<u32>) -> Self {
        self.coverage = coverage;
        self
    }

    pub fn kind(&self) -> VariantKind {
        match self.call {
            VariantCall::Substitution { .. } => VariantKind::Substitution,
            VariantCall::Heteroplasmy(_) => VariantKind::Heteroplasmy,
            VariantCall::Deletion => VariantKind::Deletion,
            VariantCall::Insertion { .. } => VariantKind::Insertion,
        }
    }

    /// Single called base; insertions have none.
    pub fn called_base(&self) -> Option<char> {
        match &self.call {
            VariantCall::Substitution { base } => Some(*base),
            VariantCall::Heteroplasmy(het) => Some(het.base),
            VariantCall::Deletion => Some(DELETION_MARKER),
            VariantCall::Insertion { .. } => None,
        }
    }

    pub fn inserted_sequence(&self) -> Option<&str> {
        match &self.call {
            VariantCall::Insertion { sequence } => Some(sequence),
            _ => None,
        }
    }

    /// Non-reference allele frequency; zero for anything but heteroplasmies.
    pub fn heteroplasmy_level(&self) -> f64 {
        match &self.call {
            VariantCall::Heteroplasmy(het) => het.level,
            _ => 0.0,
        }
    }

    pub fn major(&self) -> Option<AlleleLevel> {
        match &self.call {
            VariantCall::Heteroplasmy(het) => Some(het.major),
            _ => None,
        }
    }

    pub fn minor(&self) -> Option<AlleleLevel> {
        match &self.call {
            VariantCall::Heteroplasmy(het) => Some(het.minor),
            _ => None,
        }
    }

    /// Phylotree-style insertion label, e.g. `300.1AT`.
    pub fn insertion_label(&self) -> Option<String> {
        self.inserted_sequence()
            .map(|seq| format!("{}.1{}", self.position, seq))
    }
}
