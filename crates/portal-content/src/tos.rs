//! Terms of service shown to patients in the time-of-test flow.
//!
//! The document is a fixed sequence of blocks. Text lives in the
//! translation catalog under `testResult.tos.document.*`.

use crate::i18n::TextProvider;

pub const TOS_EFFECTIVE_DATE: &str = "12/4/2020";

const KEY_PREFIX: &str = "testResult.tos.document";

/// One block of the document. Keys are relative to `testResult.tos.document`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TosBlock {
    Date(&'static str),
    Heading {
        level: u8,
        anchor: &'static str,
        key: &'static str,
    },
    Paragraph(&'static str),
    ListItem(&'static str),
    NestedListItem(&'static str),
    /// Paragraph whose text marks one link as `<0>label</0>`
    LinkedParagraph {
        key: &'static str,
        href: &'static str,
        link_text: &'static str,
    },
}

impl TosBlock {
    /// Full catalog key, if the block has one.
    pub fn key(&self) -> Option<String> {
        let key = match self {
            TosBlock::Date(_) => return None,
            TosBlock::Heading { key, .. } => key,
            TosBlock::Paragraph(key) => key,
            TosBlock::ListItem(key) => key,
            TosBlock::NestedListItem(key) => key,
            TosBlock::LinkedParagraph { key, .. } => key,
        };
        Some(format!("{}.{}", KEY_PREFIX, key))
    }

    fn is_list_item(&self) -> bool {
        matches!(self, TosBlock::ListItem(_) | TosBlock::NestedListItem(_))
    }
}

const fn h2(anchor: &'static str, key: &'static str) -> TosBlock {
    TosBlock::Heading { level: 2, anchor, key }
}

const fn h3(anchor: &'static str, key: &'static str) -> TosBlock {
    TosBlock::Heading { level: 3, anchor, key }
}

pub const TERMS_OF_SERVICE: &[TosBlock] = &[
    TosBlock::Date(TOS_EFFECTIVE_DATE),
    TosBlock::LinkedParagraph {
        key: "intro.p0",
        href: "https://www.cdc.gov/other/information.html",
        link_text: "CDC’s Privacy Policies",
    },
    h2("scope", "scope.heading"),
    TosBlock::Paragraph("scope.p0"),
    h2("definitions", "definitions.heading"),
    TosBlock::ListItem("definitions.l0"),
    TosBlock::Paragraph("definitions.p0"),
    TosBlock::ListItem("definitions.l1"),
    TosBlock::Paragraph("definitions.p1"),
    h2("data-rights-and-usage", "dataRights.heading"),
    h3("accounts-registration", "dataRights.subheading"),
    TosBlock::ListItem("dataRights.l0"),
    TosBlock::Paragraph("dataRights.p01"),
    TosBlock::LinkedParagraph {
        key: "dataRights.p02",
        href: "mailto:support@simplereport.gov",
        link_text: "support@simplereport.gov",
    },
    TosBlock::ListItem("dataRights.l1"),
    TosBlock::Paragraph("dataRights.p1"),
    TosBlock::ListItem("dataRights.l2"),
    TosBlock::Paragraph("dataRights.p2"),
    h3("privacy", "privacy.heading"),
    TosBlock::LinkedParagraph {
        key: "privacy.p0",
        href: "https://www.cms.gov/Research-Statistics-Data-and-Systems/Computer-Data-and-Systems/Privacy/PrivacyActof1974.html",
        link_text: "click here",
    },
    TosBlock::Paragraph("privacy.p1"),
    h3("use-of-data", "useOfData.heading"),
    TosBlock::Paragraph("useOfData.p0"),
    h3("sharing-of-data", "sharingOfData.heading"),
    TosBlock::LinkedParagraph {
        key: "sharingOfData.p0",
        href: "https://www.hhs.gov/sites/default/files/covid-19-laboratory-data-reporting-guidance.pdf",
        link_text: "HHS COVID-19 Laboratory Reporting Requirements",
    },
    h3("other-responsibilities", "otherResponsibilities.heading"),
    TosBlock::ListItem("otherResponsibilities.ul.preheading1"),
    TosBlock::NestedListItem("otherResponsibilities.ul.li0"),
    TosBlock::NestedListItem("otherResponsibilities.ul.li1"),
    TosBlock::NestedListItem("otherResponsibilities.ul.li2"),
    TosBlock::NestedListItem("otherResponsibilities.ul.li3"),
    TosBlock::ListItem("otherResponsibilities.ul.preheading2"),
    TosBlock::NestedListItem("otherResponsibilities.ul.li4"),
    TosBlock::NestedListItem("otherResponsibilities.ul.li5"),
    TosBlock::NestedListItem("otherResponsibilities.ul.li6"),
    TosBlock::NestedListItem("otherResponsibilities.ul.li7"),
    TosBlock::NestedListItem("otherResponsibilities.ul.li8"),
    h2("service-management", "serviceManagement.heading"),
    h3("right-to-limit", "serviceManagement.subheading"),
    TosBlock::Paragraph("serviceManagement.p0"),
    h3("service-termination", "serviceTermination.heading"),
    TosBlock::Paragraph("serviceTermination.p0"),
    TosBlock::Paragraph("serviceTermination.p1"),
    h3(
        "intellectual-property-license-grant-and-restrictions-",
        "intellectualProperty.heading",
    ),
    TosBlock::Paragraph("intellectualProperty.p0"),
    h3("disclaimer-of-warranties", "disclaimerOfWarranties.heading"),
    TosBlock::Paragraph("disclaimerOfWarranties.p0"),
    h3("limitations-on-liability", "limitationOfLiability.heading"),
    TosBlock::Paragraph("limitationOfLiability.p0"),
    TosBlock::Paragraph("limitationOfLiability.p1"),
    h3("disputes-choice-of-law-venue-and-conflicts", "disputes.heading"),
    TosBlock::Paragraph("disputes.p0"),
    h3("indemnification", "indemnification.heading"),
    TosBlock::Paragraph("indemnification.p0"),
    h3("no-waiver-of-rights", "noWaiverOfRights.heading"),
    TosBlock::Paragraph("noWaiverOfRights.p0"),
    h3("data-analytics-and-monitoring-metrics", "dataAnalytics.heading"),
    TosBlock::Paragraph("dataAnalytics.p0"),
];

/// Every catalog key the document needs, in document order.
pub fn required_keys() -> Vec<String> {
    TERMS_OF_SERVICE.iter().filter_map(TosBlock::key).collect()
}

/// Headings as `(level, anchor)` for a table of contents.
pub fn anchors() -> Vec<(u8, &'static str)> {
    TERMS_OF_SERVICE
        .iter()
        .filter_map(|block| match block {
            TosBlock::Heading { level, anchor, .. } => Some((*level, *anchor)),
            _ => None,
        })
        .collect()
}

/// Render the document as Markdown.
pub fn render_markdown(text: &dyn TextProvider) -> String {
    let mut out = String::new();
    let mut previous: Option<&TosBlock> = None;

    for block in TERMS_OF_SERVICE {
        if let Some(prev) = previous {
            // list items stay in one list
            if prev.is_list_item() && block.is_list_item() {
                out.push('\n');
            } else {
                out.push_str("\n\n");
            }
        }

        let lookup = |key: &str| text.text(&format!("{}.{}", KEY_PREFIX, key));
        match block {
            TosBlock::Date(date) => out.push_str(date),
            TosBlock::Heading { level, anchor, key } => {
                out.push_str(&"#".repeat(usize::from(*level)));
                out.push(' ');
                out.push_str(&lookup(*key));
                out.push_str(&format!(" {{#{}}}", anchor));
            }
            TosBlock::Paragraph(key) => out.push_str(&lookup(*key)),
            TosBlock::ListItem(key) => {
                out.push_str("- ");
                out.push_str(&lookup(*key));
            }
            TosBlock::NestedListItem(key) => {
                out.push_str("  - ");
                out.push_str(&lookup(*key));
            }
            TosBlock::LinkedParagraph {
                key,
                href,
                link_text,
            } => out.push_str(&link_markers(&lookup(*key), href, link_text)),
        }

        previous = Some(block);
    }

    out.push('\n');
    out
}

/// Replace the `<0>label</0>` (or `<0/>`) marker with a Markdown link. An
/// empty label falls back to `default_text`.
pub fn link_markers(text: &str, href: &str, default_text: &str) -> String {
    if let Some(start) = text.find("<0/>") {
        return format!(
            "{}[{}]({}){}",
            &text[..start],
            default_text,
            href,
            &text[start + "<0/>".len()..]
        );
    }

    let Some(open) = text.find("<0>") else {
        return text.to_string();
    };
    let inner_start = open + "<0>".len();
    let Some(close_rel) = text[inner_start..].find("</0>") else {
        return text.to_string();
    };
    let close = inner_start + close_rel;

    let label = match &text[inner_start..close] {
        "" => default_text,
        label => label,
    };
    format!(
        "{}[{}]({}){}",
        &text[..open],
        label,
        href,
        &text[close + "</0>".len()..]
    )
}
