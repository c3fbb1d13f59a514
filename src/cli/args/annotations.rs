//! Annotation prefix and key override flags

use clap::Args;

use crate::config::{AnnotationNames, AnnotationOverrides, DEFAULT_MAIN_CONTAINER_KEY};

/// Prefixes the annotation keys are built from
#[derive(Debug, Clone, Args)]
#[command(next_help_heading = "Annotation names")]
pub struct AnnotationArgs {
    /// Prefix for general annotations
    #[arg(long, env = "COLLECTOR_ANNOTATION_NAME_BASE", default_value = "sdase.org/")]
    pub annotation_name_base: String,

    /// Prefix for scan related annotations
    #[arg(
        long,
        env = "COLLECTOR_ANNOTATION_NAME_SCANS",
        default_value = "clusterscanner.sdase.org/"
    )]
    pub annotation_name_scans: String,

    /// Prefix for contact related annotations
    #[arg(
        long,
        env = "COLLECTOR_ANNOTATION_NAME_CONTACT",
        default_value = "contact.sdase.org/"
    )]
    pub annotation_name_contact: String,

    /// Prefix for DefectDojo related annotations
    #[arg(
        long,
        env = "COLLECTOR_ANNOTATION_NAME_DEFECT_DOJO",
        default_value = "defectdojo.sdase.org/"
    )]
    pub annotation_name_defect_dojo: String,

    /// Label naming the container the app labels describe
    #[arg(
        long,
        env = "COLLECTOR_ANNOTATION_NAME_MAIN_CONTAINER",
        default_value = DEFAULT_MAIN_CONTAINER_KEY
    )]
    pub annotation_name_main_container: String,

    #[arg(long, env = "COLLECTOR_ANNOTATION_NAME_TEAM")]
    pub annotation_name_team: Option<String>,

    #[arg(long, env = "COLLECTOR_ANNOTATION_NAME_PRODUCT")]
    pub annotation_name_product: Option<String>,

    #[arg(long, env = "COLLECTOR_ANNOTATION_NAME_DESCRIPTION")]
    pub annotation_name_description: Option<String>,

    #[arg(long, env = "COLLECTOR_ANNOTATION_NAME_ENVIRONMENT")]
    pub annotation_name_environment: Option<String>,

    #[arg(long, env = "COLLECTOR_ANNOTATION_NAME_SLACK")]
    pub annotation_name_slack: Option<String>,

    #[arg(long, env = "COLLECTOR_ANNOTATION_NAME_ROCKETCHAT")]
    pub annotation_name_rocketchat: Option<String>,

    #[arg(long, env = "COLLECTOR_ANNOTATION_NAME_EMAIL")]
    pub annotation_name_email: Option<String>,

    #[arg(long, env = "COLLECTOR_ANNOTATION_NAME_ENGAGEMENT_TAGS")]
    pub annotation_name_engagement_tags: Option<String>,

    #[arg(long, env = "COLLECTOR_ANNOTATION_NAME_CONTAINER_TYPE")]
    pub annotation_name_container_type: Option<String>,

    #[arg(long, env = "COLLECTOR_ANNOTATION_NAME_NAMESPACE_FILTER")]
    pub annotation_name_namespace_filter: Option<String>,

    #[arg(long, env = "COLLECTOR_ANNOTATION_NAME_NEGATED_NAMESPACE_FILTER")]
    pub annotation_name_negated_namespace_filter: Option<String>,
}

impl From<AnnotationArgs> for AnnotationNames {
    fn from(args: AnnotationArgs) -> Self {
        let key = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        Self {
            base: args.annotation_name_base,
            scans: args.annotation_name_scans,
            contact: args.annotation_name_contact,
            defect_dojo: args.annotation_name_defect_dojo,
            overrides: AnnotationOverrides {
                team: key(args.annotation_name_team),
                product: key(args.annotation_name_product),
                description: key(args.annotation_name_description),
                environment: key(args.annotation_name_environment),
                slack: key(args.annotation_name_slack),
                rocketchat: key(args.annotation_name_rocketchat),
                email: key(args.annotation_name_email),
                engagement_tags: key(args.annotation_name_engagement_tags),
                container_type: key(args.annotation_name_container_type),
                namespace_filter: key(args.annotation_name_namespace_filter),
                namespace_filter_negated: key(args.annotation_name_negated_namespace_filter),
            },
            main_container: args.annotation_name_main_container,
        }
    }
}
