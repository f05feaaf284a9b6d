//! Endpoint identifiers and their per-method path templates
//!
//! Every endpoint belongs to exactly one service. Most endpoints expose a single
//! collection path for every HTTP method (the resource id is appended to it), while
//! a few carry a distinct template per method with `{placeholder}` segments.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ServiceId;
use crate::api::request::Method;

/// Path templates of one endpoint
#[derive(Debug, Clone, Copy)]
pub(crate) enum Routes {
    /// One path shared by every method
    Uniform(&'static str),
    /// A template per supported method
    PerMethod(&'static [(Method, &'static str)]),
}

macro_rules! endpoints {
    ($($(#[$meta:meta])* $variant:ident => $service:ident, $routes:expr;)*) => {
        /// A named resource path within a service
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum EndpointId {
            $($(#[$meta])* $variant,)*
        }

        impl EndpointId {
            pub const ALL: &'static [EndpointId] = &[$(Self::$variant,)*];

            /// The service that declares this endpoint
            pub fn service(&self) -> ServiceId {
                match self {
                    $(Self::$variant => ServiceId::$service,)*
                }
            }

            pub(crate) fn routes(&self) -> Routes {
                match self {
                    $(Self::$variant => $routes,)*
                }
            }
        }
    };
}

endpoints! {
    SalesTerritories => SalesTerritory, Routes::Uniform("salesTerritories");

    CorrespondenceHistory => CollectionsIntegration, Routes::Uniform("correspondenceHistory");
    Dunning => CollectionsIntegration, Routes::Uniform("dunning");
    Returns => CollectionsIntegration, Routes::Uniform("returns");
    WriteOff => CollectionsIntegration, Routes::Uniform("writeOff");

    ContactPersons => ContactPerson, Routes::Uniform("contactPersons");

    DistributionChannels => OrganizationalUnit, Routes::Uniform("distributionChannels");
    Divisions => OrganizationalUnit, Routes::Uniform("divisions");
    OrganizationalUnits => OrganizationalUnit, Routes::Uniform("organizationalUnits");

    AccountHierarchies => AccountHierarchy, Routes::Uniform("accountHierarchies");

    Accounts => Account, Routes::Uniform("accounts");

    ActivityAssignmentRules => ActivityAssignmentRule, Routes::Uniform("activityAssignmentRules");
    ActivityAssignmentRuleMembers => ActivityAssignmentRule,
        Routes::Uniform("activityAssignmentRuleMembers");

    ActivityPlans => ActivityPlan, Routes::Uniform("activityPlans");

    Appointments => Appointment, Routes::Uniform("appointments");
    AppointmentCategories => Appointment, Routes::Uniform("categories");
    AppointmentPriorities => Appointment, Routes::Uniform("priorities");
    AppointmentStatuses => Appointment, Routes::Uniform("status");

    Cases => Case, Routes::Uniform("cases");

    CompetitorProducts => CompetitorProduct, Routes::Uniform("competitorProducts");

    Documents => Document, Routes::Uniform("documents");

    Employees => Employee, Routes::Uniform("employees");

    FunctionalLocations => FunctionalLocation, Routes::Uniform("functionalLocations");

    IndividualCustomers => IndividualCustomer, Routes::Uniform("individualCustomers");

    InstalledBases => InstalledBase, Routes::Uniform("installedBases");

    Chats => Chat, Routes::Uniform("chats");

    Emails => InteractionEmail, Routes::Uniform("emails");

    CallResults => InteractionPhone, Routes::Uniform("callResults");
    PhoneCalls => InteractionPhone, Routes::Uniform("phoneCalls");

    Leads => Lead, Routes::Uniform("leads");
    LeadQualifications => Lead, Routes::Uniform("qualifications");
    LeadReasonsForStatus => Lead, Routes::Uniform("reasonForStatus");
    LeadSources => Lead, Routes::Uniform("sources");
    LeadStatuses => Lead, Routes::Uniform("statuses");

    Opportunities => Opportunity, Routes::Uniform("opportunities");
    OpportunityCategories => Opportunity, Routes::Uniform("categories");
    ContactPartyRoles => Opportunity, Routes::Uniform("contactPartyRoles");
    OpportunityCustomStatuses => Opportunity, Routes::Uniform("customStatus");
    OpportunityDocumentTypes => Opportunity, Routes::Uniform("documentTypes");
    ForecastCategories => Opportunity, Routes::Uniform("forecastCategories");
    LifecycleStatuses => Opportunity, Routes::Uniform("lifeCycleStatus");
    OpportunityPriorities => Opportunity, Routes::Uniform("priorities");
    OpportunityReasonsForStatus => Opportunity, Routes::Uniform("reasonForStatus");
    SalesCycles => Opportunity, Routes::Uniform("salesCycles");
    SalesPhases => Opportunity, Routes::Uniform("salesPhases");
    SalesPhaseProgress => Opportunity, Routes::Uniform("phaseProgress");
    OpportunitySources => Opportunity, Routes::Uniform("sources");

    ProductGroups => ProductGroup, Routes::Uniform("productGroups");

    Products => Product, Routes::Uniform("products");
    ProductSalesStatuses => Product, Routes::Uniform("salesStatus");
    ProductTypes => Product, Routes::Uniform("productTypes");
    UnitsOfMeasure => Product, Routes::Uniform("unitOfMeasures");

    RegisteredProducts => RegisteredProduct, Routes::Uniform("registeredProducts");
    RegisteredProductCategories => RegisteredProduct,
        Routes::Uniform("registeredProductCategories");

    /// Survey design collection
    SurveyDesigns => Survey, Routes::PerMethod(&[
        (Method::Get, "designs"),
        (Method::Post, "designs"),
    ]);
    /// A single survey design, addressed by `{id}`
    SurveyDesign => Survey, Routes::PerMethod(&[
        (Method::Get, "designs/{id}"),
        (Method::Delete, "designs/{id}"),
    ]);
    SurveyDesignElement => Survey, Routes::PerMethod(&[
        (Method::Post, "designs/{id}/elements"),
        (Method::Patch, "designs/{id}/elements/{elementId}"),
        (Method::Delete, "designs/{id}/elements/{elementId}"),
    ]);
    SurveyDesignProduct => Survey, Routes::PerMethod(&[
        (Method::Post, "designs/{id}/products"),
        (Method::Delete, "designs/{id}/products/{productId}"),
    ]);
}

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
