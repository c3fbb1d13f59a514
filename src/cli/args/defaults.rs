//! Default values for collector entries

use clap::{ArgAction, Args};

use crate::config::{EntryDefaults, parse_bool, parse_tag_list};
use crate::models::{ContainerType, ScanFlags};

/// Values every entry starts from before labels and annotations apply
#[derive(Debug, Clone, Args)]
#[command(next_help_heading = "Entry defaults")]
pub struct DefaultArgs {
    /// Name of the environment, required for image collection
    #[arg(long, env = "COLLECTOR_ENVIRONMENT_NAME")]
    pub environment_name: Option<String>,

    #[arg(long, env = "COLLECTOR_TEAM", default_value = "nobody")]
    pub team: String,

    #[arg(long, env = "COLLECTOR_PRODUCT")]
    pub product: Option<String>,

    #[arg(long, env = "COLLECTOR_DESCRIPTION")]
    pub description: Option<String>,

    /// Slack channel, '#' is added when missing
    #[arg(long, env = "COLLECTOR_SLACK")]
    pub slack: Option<String>,

    /// Rocketchat channel, '#' is added when missing
    #[arg(long, env = "COLLECTOR_ROCKETCHAT")]
    pub rocketchat: Option<String>,

    #[arg(long, env = "COLLECTOR_EMAIL")]
    pub email: Option<String>,

    /// application or third-party
    #[arg(long, env = "COLLECTOR_CONTAINER_TYPE", default_value = "application")]
    pub container_type: ContainerType,

    /// Comma separated DefectDojo engagement tags
    #[arg(long, env = "COLLECTOR_ENGAGEMENT_TAGS")]
    pub engagement_tags: Option<String>,

    /// Skip every image unless an annotation says otherwise
    #[arg(long, env = "COLLECTOR_SKIP", value_parser = parse_bool)]
    pub skip: bool,

    #[arg(long, env = "COLLECTOR_NAMESPACE_FILTER")]
    pub namespace_filter: Option<String>,

    #[arg(long, env = "COLLECTOR_NEGATED_NAMESPACE_FILTER")]
    pub negated_namespace_filter: Option<String>,

    #[arg(long, env = "COLLECTOR_SCAN_LIFETIME_MAX_DAYS", default_value_t = 14)]
    pub scan_lifetime_max_days: i64,

    #[arg(long, env = "COLLECTOR_IS_SCAN_BASEIMAGE_LIFETIME", default_value_t = true, action = ArgAction::Set, value_parser = parse_bool)]
    pub is_scan_baseimage_lifetime: bool,

    #[arg(long, env = "COLLECTOR_IS_SCAN_DEPENDENCY_CHECK", default_value_t = true, action = ArgAction::Set, value_parser = parse_bool)]
    pub is_scan_dependency_check: bool,

    #[arg(long, env = "COLLECTOR_IS_SCAN_DEPENDENCY_TRACK", default_value_t = false, action = ArgAction::Set, value_parser = parse_bool)]
    pub is_scan_dependency_track: bool,

    #[arg(long, env = "COLLECTOR_IS_SCAN_DISTROLESS", default_value_t = true, action = ArgAction::Set, value_parser = parse_bool)]
    pub is_scan_distroless: bool,

    #[arg(long, env = "COLLECTOR_IS_SCAN_LIFETIME", default_value_t = true, action = ArgAction::Set, value_parser = parse_bool)]
    pub is_scan_lifetime: bool,

    #[arg(long, env = "COLLECTOR_IS_SCAN_MALWARE", default_value_t = true, action = ArgAction::Set, value_parser = parse_bool)]
    pub is_scan_malware: bool,

    #[arg(long, env = "COLLECTOR_IS_SCAN_NEW_VERSION", default_value_t = true, action = ArgAction::Set, value_parser = parse_bool)]
    pub is_scan_new_version: bool,

    #[arg(long, env = "COLLECTOR_IS_SCAN_RUNASROOT", default_value_t = true, action = ArgAction::Set, value_parser = parse_bool)]
    pub is_scan_runasroot: bool,

    #[arg(long, env = "COLLECTOR_IS_SCAN_RUN_AS_PRIVILEGED", default_value_t = true, action = ArgAction::Set, value_parser = parse_bool)]
    pub is_scan_run_as_privileged: bool,

    #[arg(long, env = "COLLECTOR_IS_SCAN_POTENTIALLY_RUNNING_AS_ROOT", default_value_t = true, action = ArgAction::Set, value_parser = parse_bool)]
    pub is_scan_potentially_running_as_root: bool,

    #[arg(long, env = "COLLECTOR_IS_SCAN_POTENTIALLY_RUNNING_AS_PRIVILEGED", default_value_t = true, action = ArgAction::Set, value_parser = parse_bool)]
    pub is_scan_potentially_running_as_privileged: bool,
}

impl From<DefaultArgs> for EntryDefaults {
    fn from(args: DefaultArgs) -> Self {
        Self {
            environment: args.environment_name.unwrap_or_default(),
            team: args.team,
            product: args.product.unwrap_or_default(),
            description: args.description.unwrap_or_default(),
            slack: args.slack.unwrap_or_default(),
            rocketchat: args.rocketchat.unwrap_or_default(),
            email: args.email.unwrap_or_default(),
            container_type: args.container_type,
            engagement_tags: args
                .engagement_tags
                .as_deref()
                .map(parse_tag_list)
                .unwrap_or_default(),
            skip: args.skip,
            scans: ScanFlags {
                is_scan_baseimage_lifetime: args.is_scan_baseimage_lifetime,
                is_scan_dependency_check: args.is_scan_dependency_check,
                is_scan_dependency_track: args.is_scan_dependency_track,
                is_scan_distroless: args.is_scan_distroless,
                is_scan_lifetime: args.is_scan_lifetime,
                is_scan_malware: args.is_scan_malware,
                is_scan_new_version: args.is_scan_new_version,
                is_scan_runasroot: args.is_scan_runasroot,
                is_scan_run_as_privileged: args.is_scan_run_as_privileged,
                is_potentially_running_as_root: args.is_scan_potentially_running_as_root,
                is_potentially_running_as_privileged: args
                    .is_scan_potentially_running_as_privileged,
            },
            scan_lifetime_max_days: args.scan_lifetime_max_days,
            namespace_filter: args.namespace_filter.unwrap_or_default(),
            namespace_filter_negated: args.negated_namespace_filter.unwrap_or_default(),
        }
    }
}
