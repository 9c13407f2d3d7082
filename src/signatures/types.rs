//! Signature handler names.

/// Signature handler (`Filter`) used to authenticate the field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SignatureFilter {
    /// Adobe.PPKLite - the default public-key handler
    #[default]
    AdobePpkLite,
    /// Entrust.PPKEF
    EntrustPpkEf,
    /// CICI.SignIt
    CiciSignIt,
    /// VeriSign.PPKVS
    VeriSignPpkVs,
    /// Any other handler name
    Other(String),
}

impl SignatureFilter {
    /// Get the PDF name for this handler.
    pub fn as_pdf_name(&self) -> &str {
        match self {
            SignatureFilter::AdobePpkLite => "Adobe.PPKLite",
            SignatureFilter::EntrustPpkEf => "Entrust.PPKEF",
            SignatureFilter::CiciSignIt => "CICI.SignIt",
            SignatureFilter::VeriSignPpkVs => "VeriSign.PPKVS",
            SignatureFilter::Other(name) => name,
        }
    }

    /// Parse a PDF name into a handler.
    pub fn from_pdf_name(name: &str) -> Self {
        match name {
            "Adobe.PPKLite" => SignatureFilter::AdobePpkLite,
            "Entrust.PPKEF" => SignatureFilter::EntrustPpkEf,
            "CICI.SignIt" => SignatureFilter::CiciSignIt,
            "VeriSign.PPKVS" => SignatureFilter::VeriSignPpkVs,
            other => SignatureFilter::Other(other.to_string()),
        }
    }
}

/// Signature sub-filter type (signature format).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureSubFilter {
    /// adbe.pkcs7.detached - PKCS#7 detached signature
    #[default]
    Pkcs7Detached,
    /// adbe.pkcs7.sha1 - PKCS#7 with SHA-1 digest
    Pkcs7Sha1,
    /// ETSI.CAdES.detached - PAdES CAdES signature
    CadesDetached,
    /// ETSI.RFC3161 - Timestamp token
    Rfc3161,
}

impl SignatureSubFilter {
    /// Get the PDF name for this sub-filter.
    pub fn as_pdf_name(&self) -> &'static str {
        match self {
            SignatureSubFilter::Pkcs7Detached => "adbe.pkcs7.detached",
            SignatureSubFilter::Pkcs7Sha1 => "adbe.pkcs7.sha1",
            SignatureSubFilter::CadesDetached => "ETSI.CAdES.detached",
            SignatureSubFilter::Rfc3161 => "ETSI.RFC3161",
        }
    }

    /// Parse a PDF name into a sub-filter type.
    pub fn from_pdf_name(name: &str) -> Option<Self> {
        match name {
            "adbe.pkcs7.detached" => Some(SignatureSubFilter::Pkcs7Detached),
            "adbe.pkcs7.sha1" => Some(SignatureSubFilter::Pkcs7Sha1),
            "ETSI.CAdES.detached" => Some(SignatureSubFilter::CadesDetached),
            "ETSI.RFC3161" => Some(SignatureSubFilter::Rfc3161),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_names() {
        assert_eq!(SignatureFilter::default().as_pdf_name(), "Adobe.PPKLite");
        assert_eq!(
            SignatureFilter::from_pdf_name("VeriSign.PPKVS"),
            SignatureFilter::VeriSignPpkVs
        );
        assert_eq!(
            SignatureFilter::from_pdf_name("Acme.Sign").as_pdf_name(),
            "Acme.Sign"
        );
    }

    #[test]
    fn test_sub_filter_round_trip() {
        for sub in [
            SignatureSubFilter::Pkcs7Detached,
            SignatureSubFilter::Pkcs7Sha1,
            SignatureSubFilter::CadesDetached,
            SignatureSubFilter::Rfc3161,
        ] {
            assert_eq!(SignatureSubFilter::from_pdf_name(sub.as_pdf_name()), Some(sub));
        }
        assert_eq!(SignatureSubFilter::from_pdf_name("bogus"), None);
    }
}
