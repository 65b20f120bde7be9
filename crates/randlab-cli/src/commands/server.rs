use randlab_core::LabConfig;

pub fn run(config: LabConfig, host: &str, port: u16) {
    let session = super::make_session(config);
    let base = format!("http://{host}:{port}");

    println!("randlab server v{}", randlab_core::VERSION);
    println!("   {base}");
    println!("   session {}", session.id());
    println!();
    println!("   Endpoints:");
    println!("     GET /                   API index (try: curl {base})");
    println!("     GET /api/v1/generate    Generate samples");
    println!("     GET /api/v1/evaluate    Generate and run the test battery");
    println!("     GET /health             Health check");
    println!();
    println!("   Query params:");
    println!("     kind=mt|lcg|csprng|trng Generator (default: mt)");
    println!(
        "     seed=N                  Seed (default: {})",
        session.config().default_seed
    );
    println!(
        "     count=N                 Samples (1-{}, default: {})",
        session.config().max_sample_count,
        session.config().default_sample_count
    );
    println!("     bins=N, lag=N           Evaluate only");
    println!();
    println!("   Examples:");
    println!("     curl '{base}/api/v1/generate?kind=mt&seed=5489&count=5'");
    println!("     curl '{base}/api/v1/evaluate?kind=lcg&seed=1&count=1000'");
    println!();

    let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| super::fail(e));
    if let Err(e) = rt.block_on(randlab_server::run_server(session, host, port)) {
        super::fail(format!("server on {host}:{port} stopped: {e}"));
    }
}
