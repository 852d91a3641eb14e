use clap::Parser;
use miette::Result;
use gbx::cli::{commands, Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    gbx::logging::init(global.verbose);

    match cli.command {
        Commands::Init(args) => commands::init::run(args, &global),
        Commands::Motor(cmd) => commands::motor::run(cmd, &global),
        Commands::Reducer(cmd) => commands::reducer::run(cmd, &global),
        Commands::Ratios(args) => commands::ratios::run(args, &global),
        Commands::Candidates(args) => commands::candidates::run(args, &global),
        Commands::Select(args) => commands::select::run(args, &global),
        Commands::Adapter(args) => commands::adapter::run(args, &global),
        Commands::Bushing(args) => commands::bushing::run(args, &global),
        Commands::Drawings(cmd) => commands::drawings::run(cmd, &global),
        Commands::Import(args) => commands::import::run(args, &global),
        Commands::Validate(args) => commands::validate::run(args, &global),
        Commands::Completions(args) => commands::completions::run(args),
    }
}
