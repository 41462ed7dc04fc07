pub mod bundle_dts;
pub mod completions;
pub mod copy;
pub mod correct_branch;
pub mod publish;
pub mod remove_files;
pub mod update_deps;
