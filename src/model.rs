/// Substitute for any absent scalar field.
pub const PLACEHOLDER: &str = "N/A";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const BRAND: Color = Color([30, 58, 138]);
    pub const WHITE: Color = Color([255, 255, 255]);
    pub const TEXT: Color = Color([33, 37, 41]);
    pub const MUTED: Color = Color([107, 114, 128]);
    pub const BORDER: Color = Color([209, 213, 219]);
    pub const CARD_FILL: Color = Color([249, 250, 251]);
    pub const BAND_FILL: Color = Color([232, 240, 254]);
    pub const GOOD: Color = Color([22, 163, 74]);
    pub const BAD: Color = Color([220, 38, 38]);

    /// Two-way status emphasis: green when `status` is the expected good value, red otherwise.
    pub fn for_status(status: &str, good: &str) -> Color {
        if status.trim().eq_ignore_ascii_case(good) {
            Color::GOOD
        } else {
            Color::BAD
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Score {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Score::Number(n) if n.fract() == 0.0 => write!(f, "{n:.0}"),
            Score::Number(n) => write!(f, "{n}"),
            Score::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Subject {
    pub name: Option<String>,
    pub email: Option<String>,
    /// Path of a PNG/JPEG photo.
    pub image: Option<String>,
    pub score: Option<Score>,
}

#[derive(Clone, Debug, Default)]
pub struct ReportDocument {
    pub id: String,
    pub subject: Subject,
    /// Display string, never parsed.
    pub completion_date: Option<String>,
    pub status: Option<String>,
    pub categories: Vec<Category>,
}

impl ReportDocument {
    /// Report status shown in the subject block: explicit status, else the first category's.
    pub fn display_status(&self) -> Option<&str> {
        self.status
            .as_deref()
            .or_else(|| self.categories.first().and_then(|c| c.status.as_deref()))
    }
}

#[derive(Clone, Debug, Default)]
pub struct Category {
    pub key: String,
    pub name: String,
    pub status: Option<String>,
    pub subsections: Vec<Subsection>,
}

#[derive(Clone, Debug)]
pub struct Subsection {
    pub key: String,
    pub name: String,
    pub payload: SectionPayload,
}

impl Subsection {
    pub fn kind(&self) -> Option<SectionKind> {
        self.payload.kind()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SectionKind {
    PersonalDetails,
    Delinquency,
    AccountSummary,
    AccountRating,
    AgreementsSummary,
    AgreementsList,
    Guarantors,
    Collateral,
    DishonouredCheques,
    Directorships,
    EnquiryHistory,
    IdentificationHistory,
    AddressHistory,
    EmploymentHistory,
    TelephoneHistory,
}

impl SectionKind {
    pub const ALL: [SectionKind; 15] = [
        SectionKind::PersonalDetails,
        SectionKind::Delinquency,
        SectionKind::AccountSummary,
        SectionKind::AccountRating,
        SectionKind::AgreementsSummary,
        SectionKind::AgreementsList,
        SectionKind::Guarantors,
        SectionKind::Collateral,
        SectionKind::DishonouredCheques,
        SectionKind::Directorships,
        SectionKind::EnquiryHistory,
        SectionKind::IdentificationHistory,
        SectionKind::AddressHistory,
        SectionKind::EmploymentHistory,
        SectionKind::TelephoneHistory,
    ];

    /// Subsection keys that select this kind, in normalised form.
    fn aliases(self) -> &'static [&'static str] {
        match self {
            SectionKind::PersonalDetails => &["personaldetails", "personalinformation"],
            SectionKind::Delinquency => &["delinquency", "delinquencyinformation"],
            SectionKind::AccountSummary => &["accountsummary", "creditaccountsummary"],
            SectionKind::AccountRating => &["accountrating", "creditrating"],
            SectionKind::AgreementsSummary => &["agreementssummary", "creditagreementssummary"],
            SectionKind::AgreementsList => &["agreements", "agreementslist", "creditagreements"],
            SectionKind::Guarantors => &["guarantors", "guarantor", "guarantorinformation"],
            SectionKind::Collateral => &["collateral", "collateralinformation"],
            SectionKind::DishonouredCheques => &["dishonouredcheques", "dishonoredchecks"],
            SectionKind::Directorships => &["directorships", "directorship", "directorinformation"],
            SectionKind::EnquiryHistory => &["enquiryhistory", "enquiries", "inquiryhistory"],
            SectionKind::IdentificationHistory => &["identificationhistory"],
            SectionKind::AddressHistory => &["addresshistory"],
            SectionKind::EmploymentHistory => &["employmenthistory"],
            SectionKind::TelephoneHistory => &["telephonehistory", "phonehistory"],
        }
    }

    /// Resolve a subsection key, ignoring case and separators
    /// (`accountSummary`, `account_summary` and `Account Summary` are equal).
    pub fn from_key(key: &str) -> Option<SectionKind> {
        let normalised: String = key
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        SectionKind::ALL
            .into_iter()
            .find(|kind| kind.aliases().contains(&normalised.as_str()))
    }

    /// Canonical camelCase key.
    pub fn key(self) -> &'static str {
        match self {
            SectionKind::PersonalDetails => "personalDetails",
            SectionKind::Delinquency => "delinquency",
            SectionKind::AccountSummary => "accountSummary",
            SectionKind::AccountRating => "accountRating",
            SectionKind::AgreementsSummary => "agreementsSummary",
            SectionKind::AgreementsList => "agreements",
            SectionKind::Guarantors => "guarantors",
            SectionKind::Collateral => "collateral",
            SectionKind::DishonouredCheques => "dishonouredCheques",
            SectionKind::Directorships => "directorships",
            SectionKind::EnquiryHistory => "enquiryHistory",
            SectionKind::IdentificationHistory => "identificationHistory",
            SectionKind::AddressHistory => "addressHistory",
            SectionKind::EmploymentHistory => "employmentHistory",
            SectionKind::TelephoneHistory => "telephoneHistory",
        }
    }
}

#[derive(Clone, Debug)]
pub enum SectionPayload {
    PersonalDetails(PersonalDetails),
    Delinquency(Delinquency),
    AccountSummary(AccountSummary),
    AccountRating(AccountRating),
    AgreementsSummary(AgreementsSummary),
    AgreementsList(Vec<Agreement>),
    Guarantors(Vec<Guarantor>),
    Collateral(Vec<Collateral>),
    DishonouredCheques(DishonouredCheques),
    Directorships(Vec<Directorship>),
    EnquiryHistory(Vec<Enquiry>),
    IdentificationHistory(Vec<Identification>),
    AddressHistory(Vec<AddressRecord>),
    EmploymentHistory(Vec<Employment>),
    TelephoneHistory(Vec<Telephone>),
    Other(GenericPayload),
}

impl SectionPayload {
    pub fn kind(&self) -> Option<SectionKind> {
        Some(match self {
            SectionPayload::PersonalDetails(_) => SectionKind::PersonalDetails,
            SectionPayload::Delinquency(_) => SectionKind::Delinquency,
            SectionPayload::AccountSummary(_) => SectionKind::AccountSummary,
            SectionPayload::AccountRating(_) => SectionKind::AccountRating,
            SectionPayload::AgreementsSummary(_) => SectionKind::AgreementsSummary,
            SectionPayload::AgreementsList(_) => SectionKind::AgreementsList,
            SectionPayload::Guarantors(_) => SectionKind::Guarantors,
            SectionPayload::Collateral(_) => SectionKind::Collateral,
            SectionPayload::DishonouredCheques(_) => SectionKind::DishonouredCheques,
            SectionPayload::Directorships(_) => SectionKind::Directorships,
            SectionPayload::EnquiryHistory(_) => SectionKind::EnquiryHistory,
            SectionPayload::IdentificationHistory(_) => SectionKind::IdentificationHistory,
            SectionPayload::AddressHistory(_) => SectionKind::AddressHistory,
            SectionPayload::EmploymentHistory(_) => SectionKind::EmploymentHistory,
            SectionPayload::TelephoneHistory(_) => SectionKind::TelephoneHistory,
            SectionPayload::Other(_) => return None,
        })
    }
}

/// Payload of a subsection whose key matched no known kind.
#[derive(Clone, Debug, PartialEq)]
pub enum GenericPayload {
    Fields(Vec<(String, String)>),
    Text(String),
}

#[derive(Clone, Debug, Default)]
pub struct PersonalDetails {
    pub title: Option<String>,
    pub surname: Option<String>,
    pub first_name: Option<String>,
    pub other_names: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub marital_status: Option<String>,
    pub nationality: Option<String>,
    pub bvn: Option<String>,
    pub national_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub employer: Option<String>,
    pub address: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct DelinquencyRecord {
    pub account_number: Option<String>,
    pub kind: Option<String>,
    pub status: Option<String>,
    pub amount: Option<String>,
    pub period: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct Delinquency {
    pub status: Option<String>,
    /// Worst-case record.
    pub highest: Option<DelinquencyRecord>,
    pub records: Vec<DelinquencyRecord>,
}

#[derive(Clone, Debug, Default)]
pub struct AccountEntry {
    pub account_number: Option<String>,
    pub account_type: Option<String>,
    pub status: Option<String>,
    pub balance: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct AccountSummary {
    pub total_accounts: Option<String>,
    pub active_accounts: Option<String>,
    pub closed_accounts: Option<String>,
    pub delinquent_accounts: Option<String>,
    pub accounts: Vec<AccountEntry>,
}

#[derive(Clone, Debug, Default)]
pub struct RatingEntry {
    pub date: Option<String>,
    pub score: Option<String>,
    pub rating: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct AccountRating {
    pub score: Option<String>,
    pub rating: Option<String>,
    pub risk_level: Option<String>,
    pub last_updated: Option<String>,
    pub history: Vec<RatingEntry>,
}

#[derive(Clone, Debug, Default)]
pub struct Agreement {
    pub account_number: Option<String>,
    pub facility_type: Option<String>,
    pub subscriber: Option<String>,
    /// Open/Closed.
    pub account_status: Option<String>,
    /// Performing/Non-Performing.
    pub performance_status: Option<String>,
    /// Display amount such as `"750,000.00"`.
    pub outstanding_balance: Option<String>,
    pub amount_overdue: Option<String>,
    pub date_opened: Option<String>,
}

impl Agreement {
    pub fn is_open(&self) -> bool {
        self.account_status
            .as_deref()
            .is_some_and(|s| s.trim().eq_ignore_ascii_case("open"))
    }

    pub fn is_performing(&self) -> bool {
        self.performance_status
            .as_deref()
            .is_some_and(|s| s.trim().eq_ignore_ascii_case("performing"))
    }
}

#[derive(Clone, Debug, Default)]
pub struct AgreementsSummary {
    pub status: Option<String>,
    pub agreements: Vec<Agreement>,
}

#[derive(Clone, Debug, Default)]
pub struct Guarantor {
    pub name: Option<String>,
    pub account_number: Option<String>,
    pub date: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct Collateral {
    pub kind: Option<String>,
    pub value: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct Directorship {
    pub company: Option<String>,
    pub position: Option<String>,
    pub appointed: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct DishonouredCheques {
    pub count: Option<String>,
    pub total_amount: Option<String>,
    pub status: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct Enquiry {
    pub date: Option<String>,
    pub enquirer: Option<String>,
    pub reason: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct Identification {
    pub id_type: Option<String>,
    pub id_number: Option<String>,
    pub issue_date: Option<String>,
    pub expiry_date: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct AddressRecord {
    pub address: Option<String>,
    pub kind: Option<String>,
    pub date_reported: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct Employment {
    pub employer: Option<String>,
    pub position: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub date_reported: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct Telephone {
    pub home: Option<String>,
    pub work: Option<String>,
    pub mobile: Option<String>,
    pub date_reported: Option<String>,
}
