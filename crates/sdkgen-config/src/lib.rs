pub mod contracts;
mod error;
mod readme;
mod run;
mod spec_repo;
mod swagger;
mod typespec;

pub use error::{ConfigError, ContractError};
pub use readme::{SwaggerToSdkEntry, find_swagger_to_sdk_entries, is_sdk_enabled_in_readme};
pub use run::{
    LogPaths, RunConfig, RunEnv, RunMode, SdkReleaseType, language_for_repo, spec_config_prefix,
};
pub use spec_repo::{SPEC_REPO_CONFIG_FILE, SpecRepoConfig, load_spec_repo_config};
pub use swagger::{
    ArtifactOptions, ArtifactSearch, ChangelogScriptOptions, GenerateOptions, InitOptions,
    PackageOptions, Pattern, SwaggerToSdkConfig, load_swagger_to_sdk_config,
    parse_swagger_to_sdk_config,
};
pub use typespec::{TSPCONFIG_FILE_NAME, find_sdk_to_generate_from_typespec_project, tspconfig_file};

pub type Result<T> = std::result::Result<T, ConfigError>;
