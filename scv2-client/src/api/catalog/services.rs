//! Service identifiers of the Sales/Service Cloud V2 API

use serde::{Deserialize, Serialize};
use std::fmt;

/// A backend microservice of the tenant API
///
/// The value returned by [`ServiceId::as_str`] is the URL segment that follows
/// the API base path, e.g. `account-service`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ServiceId {
    SalesTerritory,
    CollectionsIntegration,
    ContactPerson,
    OrganizationalUnit,
    AccountHierarchy,
    Account,
    ActivityAssignmentRule,
    ActivityPlan,
    Appointment,
    Case,
    CompetitorProduct,
    Document,
    Employee,
    FunctionalLocation,
    IndividualCustomer,
    InstalledBase,
    Chat,
    InteractionEmail,
    InteractionPhone,
    Lead,
    Opportunity,
    ProductGroup,
    Product,
    RegisteredProduct,
    Survey,
}

impl ServiceId {
    pub const ALL: [ServiceId; 25] = [
        Self::SalesTerritory,
        Self::CollectionsIntegration,
        Self::ContactPerson,
        Self::OrganizationalUnit,
        Self::AccountHierarchy,
        Self::Account,
        Self::ActivityAssignmentRule,
        Self::ActivityPlan,
        Self::Appointment,
        Self::Case,
        Self::CompetitorProduct,
        Self::Document,
        Self::Employee,
        Self::FunctionalLocation,
        Self::IndividualCustomer,
        Self::InstalledBase,
        Self::Chat,
        Self::InteractionEmail,
        Self::InteractionPhone,
        Self::Lead,
        Self::Opportunity,
        Self::ProductGroup,
        Self::Product,
        Self::RegisteredProduct,
        Self::Survey,
    ];

    /// URL path segment of the service
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SalesTerritory => "sales-territory-service",
            Self::CollectionsIntegration => "collections-integration-service",
            Self::ContactPerson => "contact-person-service",
            Self::OrganizationalUnit => "organizational-unit-service",
            Self::AccountHierarchy => "account-hierarchy-service",
            Self::Account => "account-service",
            Self::ActivityAssignmentRule => "activity-assignment-rule-service",
            Self::ActivityPlan => "activity-plan-service",
            Self::Appointment => "appointment-service",
            Self::Case => "case-service",
            Self::CompetitorProduct => "competitor-product-service",
            Self::Document => "document-service",
            Self::Employee => "employee-service",
            Self::FunctionalLocation => "functional-location-service",
            Self::IndividualCustomer => "individual-customer-service",
            Self::InstalledBase => "installed-base-service",
            Self::Chat => "chat-service",
            Self::InteractionEmail => "email-service",
            Self::InteractionPhone => "phone-service",
            Self::Lead => "lead-service",
            Self::Opportunity => "opportunity-service",
            Self::ProductGroup => "product-group-service",
            Self::Product => "product-service",
            Self::RegisteredProduct => "registered-product-service",
            Self::Survey => "survey-service",
        }
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
