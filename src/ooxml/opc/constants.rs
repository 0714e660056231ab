/// Constant values related to the Open Packaging Convention.
///
/// This module contains the content type URIs, XML namespaces, and
/// relationship types needed to locate and validate the main part of a
/// WordprocessingML package.

/// Content type URIs (like MIME-types) that specify a part's format
pub mod content_type {
    // WordprocessingML main parts
    pub const WML_DOCUMENT_MAIN: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
    pub const WML_TEMPLATE_MAIN: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.template.main+xml";
    pub const WML_DOCUMENT_MACRO_MAIN: &str = "application/vnd.ms-word.document.macroEnabled.main+xml";
    pub const WML_TEMPLATE_MACRO_MAIN: &str =
        "application/vnd.ms-word.template.macroEnabledTemplate.main+xml";

    // Package parts
    pub const OPC_RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
    pub const XML: &str = "application/xml";
}

/// XML namespace URIs
pub mod namespace {
    pub const OPC_CONTENT_TYPES: &str =
        "http://schemas.openxmlformats.org/package/2006/content-types";
    pub const OPC_RELATIONSHIPS: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships";
    pub const WML_MAIN: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
}

/// Relationship type URIs
pub mod relationship_type {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
}

/// Relationship target modes
pub mod target_mode {
    pub const INTERNAL: &str = "Internal";
    pub const EXTERNAL: &str = "External";
}
