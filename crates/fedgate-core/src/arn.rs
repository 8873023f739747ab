//! Amazon Resource Name (ARN) parsing and validation
//!
//! ARNs take the form `arn:partition:service:region:account-id:resource`,
//! where the resource tail may itself carry a resource type separated from
//! the resource by the first `:` or `/`. The parsed form round-trips to the
//! exact input string via `Display`.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Regions the validator recognizes. A region field may also be empty or `*`
/// (global services such as S3 and IAM leave it empty).
const KNOWN_REGIONS: &[&str] = &[
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "af-south-1",
    "ap-east-1",
    "ap-south-1",
    "ap-south-2",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-northeast-3",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-southeast-3",
    "ap-southeast-4",
    "ca-central-1",
    "ca-west-1",
    "eu-central-1",
    "eu-central-2",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "eu-north-1",
    "eu-south-1",
    "eu-south-2",
    "il-central-1",
    "me-central-1",
    "me-south-1",
    "sa-east-1",
    "us-gov-east-1",
    "us-gov-west-1",
    "cn-north-1",
    "cn-northwest-1",
];

/// A parsed Amazon Resource Name
///
/// `resource_type` and `separator` are empty when the resource tail carries
/// no embedded separator (e.g. an S3 bucket ARN).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arn {
    /// Partition, `aws` or `aws-<suffix>` (e.g. `aws-cn`, `aws-us-gov`)
    pub partition: String,
    /// Service namespace (e.g. `iam`, `s3`, `sts`)
    pub service: String,
    /// Region, possibly empty or `*`
    pub region: String,
    /// 12-digit account id, possibly empty or `*`
    pub account_id: String,
    /// Resource type, empty when the tail has no separator
    pub resource_type: String,
    /// `:` or `/`, empty when the tail has no separator
    pub separator: String,
    /// Resource name
    pub resource: String,
}

impl Arn {
    /// Check whether a string conforms to the ARN grammar.
    ///
    /// Rejects strings containing whitespace, with fewer than 5 colons, with
    /// a partition other than `aws`/`aws-*`, an empty service, an
    /// unrecognized non-empty/non-`*` region, or an account id that is
    /// neither empty, `*`, nor exactly 12 digits.
    pub fn validate(s: &str) -> bool {
        if s.chars().any(char::is_whitespace) {
            return false;
        }
        if s.matches(':').count() < 5 {
            return false;
        }
        let fields: Vec<&str> = s.splitn(6, ':').collect();
        if fields[0] != "arn" {
            return false;
        }
        let partition = fields[1];
        if partition != "aws" && !(partition.starts_with("aws-") && partition.len() > 4) {
            return false;
        }
        if fields[2].is_empty() {
            return false;
        }
        let region = fields[3];
        if !region.is_empty() && region != "*" && !KNOWN_REGIONS.contains(&region) {
            return false;
        }
        let account = fields[4];
        if !account.is_empty()
            && account != "*"
            && !(account.len() == 12 && account.chars().all(|c| c.is_ascii_digit()))
        {
            return false;
        }
        true
    }

    /// Parse an ARN string into its components.
    ///
    /// The resource tail is split once on the first `:` if present, else on
    /// the first `/`; otherwise the whole tail is the resource.
    pub fn parse(s: &str) -> Result<Arn> {
        if !Self::validate(s) {
            return Err(CoreError::InvalidArn(s.to_string()));
        }
        let fields: Vec<&str> = s.splitn(6, ':').collect();
        let tail = fields[5];

        let (resource_type, separator, resource) = if let Some(i) = tail.find(':') {
            (&tail[..i], ":", &tail[i + 1..])
        } else if let Some(i) = tail.find('/') {
            (&tail[..i], "/", &tail[i + 1..])
        } else {
            ("", "", tail)
        };

        Ok(Arn {
            partition: fields[1].to_string(),
            service: fields[2].to_string(),
            region: fields[3].to_string(),
            account_id: fields[4].to_string(),
            resource_type: resource_type.to_string(),
            separator: separator.to_string(),
            resource: resource.to_string(),
        })
    }

    /// Whether this ARN names an IAM role
    pub fn is_role(&self) -> bool {
        self.service == "iam" && self.resource_type == "role"
    }

    /// Whether this ARN belongs to the given account id
    pub fn account_matches(&self, account_id: &str) -> bool {
        self.account_id == account_id
    }
}

impl std::fmt::Display for Arn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "arn:{}:{}:{}:{}:{}{}{}",
            self.partition,
            self.service,
            self.region,
            self.account_id,
            self.resource_type,
            self.separator,
            self.resource
        )
    }
}

impl std::str::FromStr for Arn {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Arn> {
        Arn::parse(s)
    }
}
