fn main() {
    // Collects build and git metadata exposed by the /health endpoint.
    built::write_built_file().expect("Failed to acquire build-time information");
}
