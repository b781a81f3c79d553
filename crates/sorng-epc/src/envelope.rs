//! Status envelopes wrapping every Maestro response.
//!
//! Each reply is a single document of the form:
//!
//! ```xml
//! <status code="200" message="OK">
//!   <describe-regions-response>
//!     <region id="us-east"/>
//!   </describe-regions-response>
//! </status>
//! ```
//!
//! The root carries the application-level outcome; the nested element is
//! named after the action and holds the records. A code other than `"200"`
//! means the call failed even when the HTTP exchange succeeded.
//!
//! Every envelope shape implements [`Envelope`], so [`decode`] can check the
//! status without knowing which operation produced the document.

use crate::error::{EpcError, EpcResult};
use crate::types::{ImageList, InstanceSet, KeySet, ProjectList, RegionList, ShapeList};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::de::DeserializeOwned;

/// Status code of a successful call. Compared as a string.
pub const STATUS_OK: &str = "200";

/// Root element of every envelope.
pub const ROOT_ELEMENT: &str = "status";

/// Shared view over every response envelope.
pub trait Envelope: DeserializeOwned {
    /// What the nested `*-response` element decodes to.
    type Payload;

    /// Name of the nested element, e.g. `describe-images-response`.
    const ELEMENT: &'static str;

    fn status_code(&self) -> &str;

    fn status_message(&self) -> &str;

    fn into_payload(self) -> Self::Payload;

    fn is_success(&self) -> bool {
        self.status_code() == STATUS_OK
    }
}

/// Parse a raw response body into `E`.
///
/// The document root must be `<status>`; anything else (a proxy error page,
/// say) is [`EpcError::Decode`] whatever `check_status` is.
///
/// With `check_status` set, a code other than `"200"` becomes
/// [`EpcError::Application`] carrying the status message as-is. Without it
/// the envelope is returned whatever the code, which lookups use to treat
/// "not found" as an empty payload.
pub fn decode<E: Envelope>(raw: &[u8], check_status: bool) -> EpcResult<E> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| EpcError::decode(format!("response is not UTF-8: {}", e)))?;

    let root = root_element(text)?;
    if root != ROOT_ELEMENT {
        return Err(EpcError::decode(format!(
            "unexpected root element <{}>, expected <{}>",
            root, ROOT_ELEMENT
        )));
    }

    let envelope: E = quick_xml::de::from_str(text)?;

    if check_status && !envelope.is_success() {
        return Err(EpcError::application(
            envelope.status_code(),
            envelope.status_message(),
        ));
    }

    Ok(envelope)
}

/// Name of the first element in `text`.
fn root_element(text: &str) -> EpcResult<String> {
    let mut reader = Reader::from_str(text);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                return Ok(String::from_utf8_lossy(e.name().as_ref()).into_owned());
            }
            Ok(Event::Eof) => return Err(EpcError::decode("response has no root element")),
            Ok(_) => {}
            Err(e) => return Err(EpcError::decode(e.to_string())),
        }
    }
}

/// Declare an envelope shape: root `<status code=".." message="..">` with one
/// nested element decoding to `$payload`.
macro_rules! envelope {
    ($(#[$meta:meta])* $name:ident, $element:literal, $payload:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
        pub struct $name {
            #[serde(rename = "@code", default)]
            pub code: String,
            #[serde(rename = "@message", default)]
            pub message: String,
            #[serde(rename = $element, default)]
            pub payload: $payload,
        }

        impl Envelope for $name {
            type Payload = $payload;

            const ELEMENT: &'static str = $element;

            fn status_code(&self) -> &str {
                &self.code
            }

            fn status_message(&self) -> &str {
                &self.message
            }

            fn into_payload(self) -> Self::Payload {
                self.payload
            }
        }
    };
}

envelope!(
    /// Reply to `run-instances`.
    RunInstancesStatus,
    "run-instances-response",
    InstanceSet
);
envelope!(
    /// Reply to `describe-instances`.
    DescribeInstancesStatus,
    "describe-instances-response",
    InstanceSet
);
envelope!(DescribeImagesStatus, "describe-images-response", ImageList);
envelope!(DescribeRegionsStatus, "describe-regions-response", RegionList);
envelope!(DescribeProjectsStatus, "describe-projects-response", ProjectList);
envelope!(DescribeShapesStatus, "describe-shapes-response", ShapeList);
envelope!(
    /// Reply to `create-keypair`; `delete-keypair` answers in the same shape.
    CreateKeyPairStatus,
    "create-keypair-response",
    KeySet
);
envelope!(DescribeKeyPairsStatus, "describe-keypairs-response", KeySet);

#[cfg(test)]
mod tests {
    use super::*;

    const REGIONS_OK: &str = r#"<status code="200" message="OK"><describe-regions-response><region id="us-east"/></describe-regions-response></status>"#;
    const BAD_PROJECT: &str = r#"<status code="400" message="Bad project"/>"#;

    #[test]
    fn decode_regions_success() {
        let env: DescribeRegionsStatus = decode(REGIONS_OK.as_bytes(), true).unwrap();
        assert!(env.is_success());
        let regions = env.into_payload().regions;
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].id, "us-east");
    }

    #[test]
    fn decode_non_200_with_check_is_application_error() {
        let err = decode::<DescribeRegionsStatus>(BAD_PROJECT.as_bytes(), true).unwrap_err();
        match err {
            EpcError::Application { code, message, .. } => {
                assert_eq!(code, "400");
                assert_eq!(message, "Bad project");
            }
            other => panic!("expected application error, got {:?}", other),
        }
    }

    #[test]
    fn decode_non_200_without_check_returns_empty_payload() {
        let env: DescribeRegionsStatus = decode(BAD_PROJECT.as_bytes(), false).unwrap();
        assert_eq!(env.status_code(), "400");
        assert_eq!(env.status_message(), "Bad project");
        assert!(env.into_payload().regions.is_empty());
    }

    #[test]
    fn decode_missing_key_without_check_is_empty_key() {
        let env: DescribeKeyPairsStatus = decode(
            br#"<status code="404" message="Key pair not found"/>"#,
            false,
        )
        .unwrap();
        assert!(env.into_payload().into_key().is_empty());
    }

    #[test]
    fn status_compared_as_string() {
        let xml = r#"<status code="200.0" message="odd"/>"#;
        let err = decode::<DescribeRegionsStatus>(xml.as_bytes(), true).unwrap_err();
        assert_eq!(err.message(), "odd");
    }

    #[test]
    fn truncated_document_is_decode_error() {
        let truncated = &REGIONS_OK[..REGIONS_OK.len() - 40];
        for check in [true, false] {
            let err = decode::<DescribeRegionsStatus>(truncated.as_bytes(), check).unwrap_err();
            assert!(err.is_decode(), "got {:?}", err);
        }
    }

    #[test]
    fn truncated_mid_tag_is_decode_error() {
        let xml = r#"<status code="200" message="OK"><describe-regions-response><region id="us-"#;
        let err = decode::<DescribeRegionsStatus>(xml.as_bytes(), false).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn empty_body_is_decode_error() {
        let err = decode::<DescribeImagesStatus>(b"", true).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn non_utf8_is_decode_error() {
        let err = decode::<DescribeImagesStatus>(&[0x3c, 0xff, 0xfe, 0x3e], true).unwrap_err();
        assert!(err.is_decode());
        assert!(err.message().contains("UTF-8"));
    }

    #[test]
    fn decode_image_list() {
        let xml = r#"<status code="200" message="OK">
            <describe-images-response>
                <image id="CentOS7_64-bit" description="CentOS 7" group="Linux" state="AVAILABLE" size_MB="10240"/>
                <image id="Win2016" description="Windows Server 2016" group="Windows" state="AVAILABLE" size_MB="40960"/>
            </describe-images-response>
        </status>"#;
        let images = decode::<DescribeImagesStatus>(xml.as_bytes(), true)
            .unwrap()
            .into_payload()
            .images;
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].id, "CentOS7_64-bit");
        assert_eq!(images[1].group, "Windows");
        assert_eq!(images[1].size_mb(), Some(40960));
    }

    #[test]
    fn decode_run_instances() {
        let xml = r#"<status code="200" message="Instance is being created">
            <run-instances-response>
                <instance instanceID="EPUAKHAW0123" region="EPAM-BY1" state="CREATING" cpu="1"
                    memory="2048" shape="SMALL" image="CentOS7_64-bit" owner="dev@example.com"/>
            </run-instances-response>
        </status>"#;
        let inst = decode::<RunInstancesStatus>(xml.as_bytes(), true)
            .unwrap()
            .into_payload()
            .into_instance();
        assert_eq!(inst.id, "EPUAKHAW0123");
        assert_eq!(inst.state, "CREATING");
        assert_eq!(inst.cpu_count(), Some(1));
    }

    #[test]
    fn wrong_payload_element_is_ignored() {
        // A describe-instances envelope does not see a run-instances payload.
        let xml = r#"<status code="200" message="OK"><run-instances-response><instance instanceID="i-1"/></run-instances-response></status>"#;
        let env: DescribeInstancesStatus = decode(xml.as_bytes(), true).unwrap();
        assert!(env.into_payload().into_instance().is_empty());
    }

    #[test]
    fn decode_shapes_and_projects() {
        let shapes = decode::<DescribeShapesStatus>(
            br#"<status code="200" message="OK"><describe-shapes-response><shape name="SMALL" cpu="1" memory_MB="2048"/><shape name="LARGE" cpu="4" memory_MB="8192"/></describe-shapes-response></status>"#,
            true,
        )
        .unwrap()
        .into_payload()
        .shapes;
        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes[1].memory_mb(), Some(8192));

        let projects = decode::<DescribeProjectsStatus>(
            br#"<status code="200" message="OK"><describe-projects-response><project projectID="DEMO-PRJ"/></describe-projects-response></status>"#,
            true,
        )
        .unwrap()
        .into_payload()
        .projects;
        assert_eq!(projects[0].id, "DEMO-PRJ");
    }

    #[test]
    fn foreign_root_is_decode_error() {
        let page = b"<html><body>502 Bad Gateway</body></html>";
        for check in [true, false] {
            let err = decode::<DescribeRegionsStatus>(page, check).unwrap_err();
            assert!(err.is_decode(), "got {:?}", err);
            assert!(err.message().contains("<html>"));
        }

        let err = decode::<DescribeKeyPairsStatus>(page, false).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn foreign_root_with_status_attributes_is_rejected() {
        let xml = r#"<html code="200" message="OK"><describe-regions-response><region id="x"/></describe-regions-response></html>"#;
        let err = decode::<DescribeRegionsStatus>(xml.as_bytes(), true).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn prolog_before_root_is_skipped() {
        let prolog = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- maestro -->
"#;
        let xml = format!("{}{}", prolog, REGIONS_OK);
        let env: DescribeRegionsStatus = decode(xml.as_bytes(), true).unwrap();
        assert_eq!(env.into_payload().regions.len(), 1);
    }

    #[test]
    fn repeated_instance_resolves_to_last() {
        let xml = r#"<status code="200" message="OK"><describe-instances-response><instance instanceID="a"/><instance instanceID="b"/></describe-instances-response></status>"#;
        let set = decode::<DescribeInstancesStatus>(xml.as_bytes(), true)
            .unwrap()
            .into_payload();
        assert_eq!(set.instances.len(), 2);
        assert_eq!(set.into_instance().id, "b");
    }

    #[test]
    fn repeated_key_resolves_to_last() {
        let xml = r#"<status code="200" message="OK"><describe-keypairs-response><key name="k1"/><key name="k2"/></describe-keypairs-response></status>"#;
        let key = decode::<DescribeKeyPairsStatus>(xml.as_bytes(), false)
            .unwrap()
            .into_payload()
            .into_key();
        assert_eq!(key.name, "k2");
    }

    #[test]
    fn element_names() {
        assert_eq!(RunInstancesStatus::ELEMENT, "run-instances-response");
        assert_eq!(CreateKeyPairStatus::ELEMENT, "create-keypair-response");
        assert_eq!(DescribeKeyPairsStatus::ELEMENT, "describe-keypairs-response");
    }
}
