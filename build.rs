#![forbid(unsafe_code)]

// Values that git or rustc can't supply (ex: building from a source tarball)
// are reported as "unknown" rather than failing the build.
fn main() {
    set_env("GIT_BRANCH", build_data::get_git_branch());
    set_env("GIT_COMMIT_SHORT", build_data::get_git_commit_short());
    set_env("GIT_DIRTY", build_data::get_git_dirty());
    set_env("RUSTC_VERSION", build_data::get_rustc_version());

    // Tells cargo not to rebuild build.rs during debug builds when other files change.
    // This speeds up development builds.
    //build_data::no_debug_rebuilds();
}

fn set_env<T: ToString, E>(name: &str, value: Result<T, E>) {
    let value = match value {
        Ok(v) => v.to_string(),
        Err(_) => "unknown".to_string(),
    };
    println!("cargo:rustc-env={}={}", name, value);
}
