//! Least-privilege access policy for a workspace's dashboard role.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{TwinRefError, TwinRefResult};

/// Identifying attributes of the workspace the policy is scoped to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceDescriptor {
    pub s3_location: String,
    pub arn: String,
    pub workspace_id: String,
}

pub const POLICY_TEMPLATE: &str = r#"{
    "Version": "2012-10-17",
    "Statement": [
        {
            "Action": ["iottwinmaker:ListWorkspaces"],
            "Resource": ["*"],
            "Effect": "Allow"
        },
        {
            "Action": ["iottwinmaker:Get*", "iottwinmaker:List*"],
            "Resource": ["{{.WorkspaceArn}}", "{{.WorkspaceArn}}/*"],
            "Effect": "Allow"
        },
        {
            "Effect": "Allow",
            "Action": [
                "kinesisvideo:GetDataEndpoint",
                "kinesisvideo:GetHLSStreamingSessionURL"
            ],
            "Resource": "*"
        },
        {
            "Effect": "Allow",
            "Action": [
                "iotsitewise:GetAssetPropertyValue",
                "iotsitewise:GetInterpolatedAssetPropertyValues"
            ],
            "Resource": "*"
        },
        {
            "Effect": "Allow",
            "Action": ["iotsitewise:BatchPutAssetPropertyValue"],
            "Resource": "*",
            "Condition": {
                "StringLike": {
                    "aws:ResourceTag/EdgeConnectorForKVS": "*{{.WorkspaceId}}*"
                }
            }
        },
        {
            "Effect": "Allow",
            "Action": ["s3:GetObject"],
            "Resource": ["{{.S3BucketArn}}", "{{.S3BucketArn}}/*"]
        }
    ]
}"#;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*\.([A-Za-z][A-Za-z0-9_]*)\s*\}\}").unwrap());

/// Render the workspace policy document as compact JSON.
pub fn load_policy(workspace: &WorkspaceDescriptor) -> TwinRefResult<String> {
    let mut values = IndexMap::new();
    values.insert("S3BucketArn", workspace.s3_location.clone());
    values.insert("WorkspaceArn", workspace.arn.clone());
    values.insert("WorkspaceId", workspace.workspace_id.clone());
    render_policy(POLICY_TEMPLATE, &values)
}

/// Compact `template` and substitute its `{{.Name}}` placeholders.
///
/// Values are JSON-string escaped. Unknown names and stray `{{` are errors.
pub fn render_policy(template: &str, values: &IndexMap<&str, String>) -> TwinRefResult<String> {
    let document: serde_json::Value = serde_json::from_str(template)?;
    let compact = serde_json::to_string(&document)?;

    let mut rendered = String::with_capacity(compact.len());
    let mut last = 0;
    for caps in PLACEHOLDER_RE.captures_iter(&compact) {
        let Some(whole) = caps.get(0) else { continue };
        let name = &caps[1];
        let value = values
            .get(name)
            .ok_or_else(|| TwinRefError::Template(format!("no value for placeholder {name:?}")))?;
        push_literal(&mut rendered, &compact, last, whole.start())?;
        rendered.push_str(&escape_json_string(value)?);
        last = whole.end();
    }
    push_literal(&mut rendered, &compact, last, compact.len())?;
    Ok(rendered)
}

/// Append template text between placeholders; any `{{` left there is a
/// malformed action. Substituted values are never re-scanned.
fn push_literal(
    rendered: &mut String,
    compact: &str,
    start: usize,
    end: usize,
) -> TwinRefResult<()> {
    let literal = &compact[start..end];
    if let Some(pos) = literal.find("{{") {
        return Err(TwinRefError::Template(format!(
            "malformed placeholder at byte {}",
            start + pos
        )));
    }
    rendered.push_str(literal);
    Ok(())
}

fn escape_json_string(value: &str) -> TwinRefResult<String> {
    let quoted = serde_json::to_string(value)?;
    Ok(quoted[1..quoted.len() - 1].to_string())
}
