use nalgebra::Point3;
use std::fmt;
use std::str::FromStr;

pub type Point = Point3<f64>;

/// The twenty canonical amino acids addressed by mutation descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AminoAcid {
    ALA,
    ARG,
    ASN,
    ASP,
    CYS,
    GLN,
    GLU,
    GLY,
    HIS,
    ILE,
    LEU,
    LYS,
    MET,
    PHE,
    PRO,
    SER,
    THR,
    TRP,
    TYR,
    VAL,
}

impl AminoAcid {
    pub const ALL: [AminoAcid; 20] = [
        AminoAcid::ALA,
        AminoAcid::ARG,
        AminoAcid::ASN,
        AminoAcid::ASP,
        AminoAcid::CYS,
        AminoAcid::GLN,
        AminoAcid::GLU,
        AminoAcid::GLY,
        AminoAcid::HIS,
        AminoAcid::ILE,
        AminoAcid::LEU,
        AminoAcid::LYS,
        AminoAcid::MET,
        AminoAcid::PHE,
        AminoAcid::PRO,
        AminoAcid::SER,
        AminoAcid::THR,
        AminoAcid::TRP,
        AminoAcid::TYR,
        AminoAcid::VAL,
    ];

    pub fn from_one_letter(code: char) -> Option<Self> {
        match code {
            'A' => Some(AminoAcid::ALA),
            'R' => Some(AminoAcid::ARG),
            'N' => Some(AminoAcid::ASN),
            'D' => Some(AminoAcid::ASP),
            'C' => Some(AminoAcid::CYS),
            'Q' => Some(AminoAcid::GLN),
            'E' => Some(AminoAcid::GLU),
            'G' => Some(AminoAcid::GLY),
            'H' => Some(AminoAcid::HIS),
            'I' => Some(AminoAcid::ILE),
            'L' => Some(AminoAcid::LEU),
            'K' => Some(AminoAcid::LYS),
            'M' => Some(AminoAcid::MET),
            'F' => Some(AminoAcid::PHE),
            'P' => Some(AminoAcid::PRO),
            'S' => Some(AminoAcid::SER),
            'T' => Some(AminoAcid::THR),
            'W' => Some(AminoAcid::TRP),
            'Y' => Some(AminoAcid::TYR),
            'V' => Some(AminoAcid::VAL),
            _ => None,
        }
    }

    pub fn one_letter(&self) -> char {
        match self {
            AminoAcid::ALA => 'A',
            AminoAcid::ARG => 'R',
            AminoAcid::ASN => 'N',
            AminoAcid::ASP => 'D',
            AminoAcid::CYS => 'C',
            AminoAcid::GLN => 'Q',
            AminoAcid::GLU => 'E',
            AminoAcid::GLY => 'G',
            AminoAcid::HIS => 'H',
            AminoAcid::ILE => 'I',
            AminoAcid::LEU => 'L',
            AminoAcid::LYS => 'K',
            AminoAcid::MET => 'M',
            AminoAcid::PHE => 'F',
            AminoAcid::PRO => 'P',
            AminoAcid::SER => 'S',
            AminoAcid::THR => 'T',
            AminoAcid::TRP => 'W',
            AminoAcid::TYR => 'Y',
            AminoAcid::VAL => 'V',
        }
    }

    pub fn three_letter(&self) -> &'static str {
        match self {
            AminoAcid::ALA => "ALA",
            AminoAcid::ARG => "ARG",
            AminoAcid::ASN => "ASN",
            AminoAcid::ASP => "ASP",
            AminoAcid::CYS => "CYS",
            AminoAcid::GLN => "GLN",
            AminoAcid::GLU => "GLU",
            AminoAcid::GLY => "GLY",
            AminoAcid::HIS => "HIS",
            AminoAcid::ILE => "ILE",
            AminoAcid::LEU => "LEU",
            AminoAcid::LYS => "LYS",
            AminoAcid::MET => "MET",
            AminoAcid::PHE => "PHE",
            AminoAcid::PRO => "PRO",
            AminoAcid::SER => "SER",
            AminoAcid::THR => "THR",
            AminoAcid::TRP => "TRP",
            AminoAcid::TYR => "TYR",
            AminoAcid::VAL => "VAL",
        }
    }
}

impl fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.three_letter())
    }
}

impl FromStr for AminoAcid {
    type Err = String;

    /// Accepts either the one-letter or the three-letter code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(code), None) = (chars.next(), chars.next()) {
            return Self::from_one_letter(code)
                .ok_or_else(|| format!("Invalid amino acid code: {}", s));
        }

        Self::ALL
            .iter()
            .copied()
            .find(|aa| aa.three_letter() == s)
            .ok_or_else(|| format!("Invalid amino acid code: {}", s))
    }
}
