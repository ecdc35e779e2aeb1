use serde_json::Value;

use super::{list, object, text};
use crate::model::{
    AccountEntry, AccountRating, AccountSummary, AddressRecord, Agreement, AgreementsSummary,
    Collateral, Delinquency, DelinquencyRecord, Directorship, DishonouredCheques, Employment,
    Enquiry, Guarantor, Identification, PersonalDetails, RatingEntry, SectionKind, SectionPayload,
    Telephone,
};

/// Entries of a list-shaped payload: the payload itself when it is an array,
/// otherwise the first of `keys` holding one.
fn entries<'a>(data: &'a Value, keys: &[&str]) -> &'a [Value] {
    match data {
        Value::Array(items) => items,
        _ => list(data, keys),
    }
}

fn parse_each<T>(items: &[Value], f: impl Fn(&Value) -> T) -> Vec<T> {
    items.iter().filter(|v| v.is_object()).map(f).collect()
}

pub(super) fn parse_payload(kind: SectionKind, data: &Value) -> SectionPayload {
    match kind {
        SectionKind::PersonalDetails => SectionPayload::PersonalDetails(personal_details(data)),
        SectionKind::Delinquency => SectionPayload::Delinquency(delinquency(data)),
        SectionKind::AccountSummary => SectionPayload::AccountSummary(account_summary(data)),
        SectionKind::AccountRating => SectionPayload::AccountRating(account_rating(data)),
        SectionKind::AgreementsSummary => {
            SectionPayload::AgreementsSummary(agreements_summary(data))
        }
        SectionKind::AgreementsList => SectionPayload::AgreementsList(parse_each(
            entries(data, &["agreements", "creditAgreements"]),
            agreement,
        )),
        SectionKind::Guarantors => SectionPayload::Guarantors(parse_each(
            entries(data, &["guarantors"]),
            |g| Guarantor {
                name: text(g, &["name", "guarantorName", "fullName"]),
                account_number: text(g, &["accountNumber", "account_number", "guaranteedAccount"]),
                date: text(g, &["date", "dateOfGuarantee", "guaranteeDate"]),
            },
        )),
        SectionKind::Collateral => SectionPayload::Collateral(parse_each(
            entries(data, &["collateral", "collaterals"]),
            |c| Collateral {
                kind: text(c, &["type", "collateralType", "kind"]),
                value: text(c, &["value", "collateralValue", "amount"]),
                description: text(c, &["description", "details"]),
            },
        )),
        SectionKind::DishonouredCheques => {
            SectionPayload::DishonouredCheques(DishonouredCheques {
                count: text(data, &["count", "numberOfCheques", "totalCount"]),
                total_amount: text(data, &["totalAmount", "amount", "total_amount"]),
                status: text(data, &["status"]),
            })
        }
        SectionKind::Directorships => SectionPayload::Directorships(parse_each(
            entries(data, &["directorships", "directors"]),
            |d| Directorship {
                company: text(d, &["companyName", "company", "businessName"]),
                position: text(d, &["position", "role", "designation"]),
                appointed: text(d, &["appointmentDate", "dateAppointed", "date"]),
            },
        )),
        SectionKind::EnquiryHistory => SectionPayload::EnquiryHistory(parse_each(
            entries(data, &["enquiries", "history"]),
            |e| Enquiry {
                date: text(e, &["date", "enquiryDate"]),
                enquirer: text(e, &["enquirer", "subscriberName", "institution"]),
                reason: text(e, &["reason", "enquiryReason", "purpose"]),
            },
        )),
        SectionKind::IdentificationHistory => SectionPayload::IdentificationHistory(parse_each(
            entries(data, &["identifications", "history"]),
            |i| Identification {
                id_type: text(i, &["type", "idType", "identificationType"]),
                id_number: text(i, &["number", "idNumber", "identificationNumber"]),
                issue_date: text(i, &["issueDate", "dateIssued"]),
                expiry_date: text(i, &["expiryDate", "dateExpires"]),
            },
        )),
        SectionKind::AddressHistory => SectionPayload::AddressHistory(parse_each(
            entries(data, &["addresses", "history"]),
            |a| AddressRecord {
                address: text(a, &["address", "fullAddress", "addressLine"]),
                kind: text(a, &["type", "addressType"]),
                date_reported: text(a, &["dateReported", "date", "lastUpdated"]),
            },
        )),
        SectionKind::EmploymentHistory => SectionPayload::EmploymentHistory(parse_each(
            entries(data, &["employments", "history"]),
            employment,
        )),
        SectionKind::TelephoneHistory => SectionPayload::TelephoneHistory(parse_each(
            entries(data, &["telephones", "history"]),
            telephone,
        )),
    }
}

fn personal_details(d: &Value) -> PersonalDetails {
    PersonalDetails {
        title: text(d, &["title"]),
        surname: text(d, &["surname", "lastName", "last_name"]),
        first_name: text(d, &["firstName", "first_name"]),
        other_names: text(d, &["otherNames", "middleName", "other_names"]),
        date_of_birth: text(d, &["dateOfBirth", "dob", "date_of_birth"]),
        gender: text(d, &["gender"]),
        marital_status: text(d, &["maritalStatus", "marital_status"]),
        nationality: text(d, &["nationality"]),
        bvn: text(d, &["bvn", "BVN", "bankVerificationNumber"]),
        national_id: text(d, &["nationalId", "nin", "NIN", "national_id"]),
        email: text(d, &["email", "emailAddress"]),
        phone: text(d, &["phone", "phoneNumber", "mobileNumber"]),
        employer: text(d, &["employer", "employerName"]),
        address: text(d, &["address", "residentialAddress"]),
    }
}

fn delinquency_record(r: &Value) -> DelinquencyRecord {
    DelinquencyRecord {
        account_number: text(r, &["accountNumber", "account_number"]),
        kind: text(r, &["type", "accountType", "facilityType"]),
        status: text(r, &["status"]),
        amount: text(r, &["amount", "amountOverdue", "value"]),
        period: text(r, &["period", "daysOverdue", "date"]),
    }
}

fn delinquency(d: &Value) -> Delinquency {
    Delinquency {
        status: text(d, &["status"]),
        highest: object(d, &["highest", "highestDelinquency", "worst"]).map(delinquency_record),
        records: parse_each(
            list(d, &["records", "delinquencies", "details", "history"]),
            delinquency_record,
        ),
    }
}

fn account_summary(d: &Value) -> AccountSummary {
    AccountSummary {
        total_accounts: text(d, &["totalAccounts", "total"]),
        active_accounts: text(d, &["activeAccounts", "active", "openAccounts"]),
        closed_accounts: text(d, &["closedAccounts", "closed"]),
        delinquent_accounts: text(d, &["delinquentAccounts", "delinquent"]),
        accounts: parse_each(list(d, &["accounts", "details"]), |a| AccountEntry {
            account_number: text(a, &["accountNumber", "account_number"]),
            account_type: text(a, &["accountType", "type", "facilityType"]),
            status: text(a, &["status", "accountStatus"]),
            balance: text(a, &["balance", "outstandingBalance", "currentBalance"]),
        }),
    }
}

fn account_rating(d: &Value) -> AccountRating {
    AccountRating {
        score: text(d, &["score", "creditScore"]),
        rating: text(d, &["rating", "grade"]),
        risk_level: text(d, &["riskLevel", "risk"]),
        last_updated: text(d, &["lastUpdated", "date"]),
        history: parse_each(list(d, &["history", "ratingHistory"]), |h| RatingEntry {
            date: text(h, &["date", "period"]),
            score: text(h, &["score"]),
            rating: text(h, &["rating", "grade"]),
        }),
    }
}

fn agreement(a: &Value) -> Agreement {
    Agreement {
        account_number: text(a, &["accountNumber", "account_number"]),
        facility_type: text(a, &["facilityType", "type", "productType"]),
        subscriber: text(a, &["subscriberName", "subscriber", "lender"]),
        account_status: text(a, &["accountStatus", "status"]),
        performance_status: text(a, &["performanceStatus", "performance"]),
        outstanding_balance: text(a, &["outstandingBalance", "currentBalance", "balance"]),
        amount_overdue: text(a, &["amountOverdue", "overdueAmount"]),
        date_opened: text(a, &["dateOpened", "openDate", "dateAccountOpened"]),
    }
}

fn agreements_summary(d: &Value) -> AgreementsSummary {
    AgreementsSummary {
        status: text(d, &["status"]),
        agreements: parse_each(entries(d, &["agreements", "creditAgreements"]), agreement),
    }
}

/// Employment entries come either as `{employer, position, startDate, endDate}`
/// or as `{employerName, occupation, dateUpdated}`.
fn employment(e: &Value) -> Employment {
    Employment {
        employer: text(e, &["employer", "employerName", "companyName"]),
        position: text(e, &["position", "occupation", "jobTitle"]),
        start_date: text(e, &["startDate", "start_date", "dateJoined"]),
        end_date: text(e, &["endDate", "end_date"]),
        date_reported: text(e, &["dateUpdated", "dateReported", "updatedOn"]),
    }
}

/// Telephone entries come either as one `{number, type}` pair or as separate
/// home/work/mobile fields.
fn telephone(t: &Value) -> Telephone {
    let mut phone = Telephone {
        home: text(t, &["homeTelephone", "homePhone", "home"]),
        work: text(t, &["workTelephone", "workPhone", "work"]),
        mobile: text(t, &["mobileTelephone", "mobilePhone", "mobile"]),
        date_reported: text(t, &["dateReported", "date", "dateUpdated"]),
    };
    if let Some(number) = text(t, &["number", "telephoneNumber", "phoneNumber"]) {
        let kind = text(t, &["type", "telephoneType"]).unwrap_or_default().to_lowercase();
        let slot = if kind.contains("home") {
            &mut phone.home
        } else if kind.contains("work") || kind.contains("office") {
            &mut phone.work
        } else {
            &mut phone.mobile
        };
        slot.get_or_insert(number);
    }
    phone
}
