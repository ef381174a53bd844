//! Clap adapter.
//!
//! Flags are not known until the ledger is drained, so the [`Command`] is
//! built at runtime with the builder API instead of clap's derive. Each
//! drained flag becomes one long option (plus a short alias for one-letter
//! keys). Everything from the first bare argument on lands in a hidden
//! trailing positional and is handed back to the caller untouched. Unknown
//! flags before that point are errors.
//!
//! Parsing follows the usual getopt conventions:
//!
//! - value flags take `--key value` or `--key=value` and may repeat; every
//!   occurrence is reported, in command-line order
//! - switches take `--key` alone (meaning `true`) or `--key=<bool>`; a value
//!   after a space is not consumed
//! - the first bare argument ends flag parsing

use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::error::BindError;

/// Id of the hidden positional collecting leftover arguments.
const ARGS_ID: &str = "__args";

/// Everything needed to register one flag.
#[derive(Debug, Clone, Default)]
pub(crate) struct FlagArg {
    pub key: String,
    pub switch: bool,
    pub help: Option<String>,
    /// Qualified env var feeding the same setting, shown in `--help`.
    pub env: Option<String>,
    /// Value in effect before flags are applied.
    pub default: Option<String>,
}

impl FlagArg {
    fn describe(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(help) = &self.help {
            parts.push(help.clone());
        }
        if let Some(env) = &self.env {
            parts.push(format!("[env: {env}]"));
        }
        if let Some(default) = &self.default
            && !default.is_empty()
        {
            parts.push(format!("[default: {default}]"));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    fn to_arg(&self) -> Arg {
        let mut arg = Arg::new(self.key.clone())
            .long(self.key.clone())
            .action(ArgAction::Append);

        let mut chars = self.key.chars();
        if let (Some(c), None) = (chars.next(), chars.next())
            && c != 'h'
        {
            arg = arg.short(c);
        }

        arg = if self.switch {
            arg.num_args(0..=1)
                .require_equals(true)
                .default_missing_value("true")
                .value_name("BOOL")
        } else {
            arg.num_args(1).allow_hyphen_values(true)
        };

        match self.describe() {
            Some(help) => arg.help(help),
            None => arg,
        }
    }
}

/// One flag occurrence on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Occurrence {
    /// Index into the flag list the command was built from.
    pub flag: usize,
    pub raw: String,
}

/// Build the command for `flags`.
pub(crate) fn command(name: &str, flags: &[FlagArg]) -> Command {
    let mut cmd = Command::new(name.to_string()).arg(
        Arg::new(ARGS_ID)
            .num_args(0..)
            .action(ArgAction::Append)
            .trailing_var_arg(true)
            .hide(true),
    );
    if flags.iter().any(|f| f.key == "help") {
        cmd = cmd.disable_help_flag(true);
    }
    for flag in flags {
        cmd = cmd.arg(flag.to_arg());
    }
    cmd
}

/// Parse `args` (program name first) against `flags`.
pub(crate) fn parse<I, T>(name: &str, flags: &[FlagArg], args: I) -> Result<ArgMatches, BindError>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Ok(command(name, flags).try_get_matches_from(args)?)
}

/// Every flag occurrence in `matches`, ordered as typed.
pub(crate) fn occurrences(matches: &ArgMatches, flags: &[FlagArg]) -> Vec<Occurrence> {
    let mut found: Vec<(usize, Occurrence)> = Vec::new();
    for (flag, arg) in flags.iter().enumerate() {
        let Some(values) = matches.get_many::<String>(&arg.key) else {
            continue;
        };
        let indices: Vec<usize> = matches
            .indices_of(&arg.key)
            .map(Iterator::collect)
            .unwrap_or_default();
        for (n, raw) in values.enumerate() {
            let position = indices.get(n).copied().unwrap_or(usize::MAX);
            found.push((
                position,
                Occurrence {
                    flag,
                    raw: raw.clone(),
                },
            ));
        }
    }
    found.sort_by_key(|(position, _)| *position);
    found.into_iter().map(|(_, occurrence)| occurrence).collect()
}

/// Arguments left over after flag parsing.
pub(crate) fn positional(matches: &ArgMatches) -> Vec<String> {
    matches
        .get_many::<String>(ARGS_ID)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::argv;

    fn value(key: &str) -> FlagArg {
        FlagArg {
            key: key.into(),
            ..FlagArg::default()
        }
    }

    fn switch(key: &str) -> FlagArg {
        FlagArg {
            key: key.into(),
            switch: true,
            ..FlagArg::default()
        }
    }

    fn raws(flags: &[FlagArg], args: &[&str]) -> Vec<(String, String)> {
        let matches = parse("app", flags, argv(args)).unwrap();
        occurrences(&matches, flags)
            .into_iter()
            .map(|o| (flags[o.flag].key.clone(), o.raw))
            .collect()
    }

    fn pair(key: &str, raw: &str) -> (String, String) {
        (key.to_string(), raw.to_string())
    }

    #[test]
    fn value_flag_forms() {
        let flags = [value("port")];
        assert_eq!(raws(&flags, &["--port", "80"]), vec![pair("port", "80")]);
        assert_eq!(raws(&flags, &["--port=80"]), vec![pair("port", "80")]);
    }

    #[test]
    fn single_letter_gets_short_alias() {
        let flags = [value("p")];
        assert_eq!(raws(&flags, &["-p", "80"]), vec![pair("p", "80")]);
        assert_eq!(raws(&flags, &["--p", "81"]), vec![pair("p", "81")]);
    }

    #[test]
    fn h_keeps_help_short() {
        let flags = [value("h")];
        assert_eq!(raws(&flags, &["--h", "x"]), vec![pair("h", "x")]);
        let err = parse("app", &flags, argv(&["-h"])).unwrap_err();
        let BindError::Cli(e) = err else {
            panic!("expected clap error");
        };
        assert_eq!(e.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn help_key_replaces_help_flag() {
        let flags = [value("help")];
        assert_eq!(raws(&flags, &["--help", "me"]), vec![pair("help", "me")]);
    }

    #[test]
    fn value_may_start_with_dash() {
        let flags = [value("offset")];
        assert_eq!(raws(&flags, &["--offset", "-5"]), vec![pair("offset", "-5")]);
    }

    #[test]
    fn switch_forms() {
        let flags = [switch("t")];
        assert_eq!(raws(&flags, &["--t"]), vec![pair("t", "true")]);
        assert_eq!(raws(&flags, &["-t"]), vec![pair("t", "true")]);
        assert_eq!(raws(&flags, &["--t=false"]), vec![pair("t", "false")]);
        assert!(raws(&flags, &[]).is_empty());
    }

    #[test]
    fn switch_does_not_consume_next_argument() {
        let flags = [switch("t")];
        let matches = parse("app", &flags, argv(&["--t", "false"])).unwrap();
        assert_eq!(occurrences(&matches, &flags).len(), 1);
        assert_eq!(positional(&matches), vec!["false"]);
    }

    #[test]
    fn occurrences_follow_command_line_order() {
        let flags = [value("a"), value("b")];
        assert_eq!(
            raws(&flags, &["--b", "1", "--a", "2", "--b", "3"]),
            vec![pair("b", "1"), pair("a", "2"), pair("b", "3")]
        );
    }

    #[test]
    fn first_bare_argument_ends_flags() {
        let flags = [value("p")];
        let matches = parse("app", &flags, argv(&["--p", "1", "serve", "--p", "2"])).unwrap();
        assert_eq!(occurrences(&matches, &flags).len(), 1);
        assert_eq!(positional(&matches), vec!["serve", "--p", "2"]);
    }

    #[test]
    fn unknown_flag_is_cli_error() {
        let err = parse("app", &[value("p")], argv(&["--nope"])).unwrap_err();
        assert!(matches!(err, BindError::Cli(_)));
    }

    #[test]
    fn misspelled_flag_is_not_swallowed() {
        let flags = [value("port")];
        for args in [&["--prot", "9000"][..], &["-port", "9000"][..]] {
            let err = parse("app", &flags, argv(args)).unwrap_err();
            let BindError::Cli(e) = err else {
                panic!("expected clap error for {args:?}");
            };
            assert_eq!(e.kind(), clap::error::ErrorKind::UnknownArgument, "{args:?}");
        }
    }

    #[test]
    fn missing_value_is_cli_error() {
        let err = parse("app", &[value("p")], argv(&["--p"])).unwrap_err();
        assert!(matches!(err, BindError::Cli(_)));
    }

    #[test]
    fn help_mentions_env_and_default() {
        let flags = [FlagArg {
            key: "port".into(),
            help: Some("Listen port".into()),
            env: Some("PORT".into()),
            default: Some("8080".into()),
            ..FlagArg::default()
        }];
        let help = command("app", &flags).render_help().to_string();
        assert!(help.contains("--port"));
        assert!(help.contains("Listen port [env: PORT] [default: 8080]"));
    }
}
