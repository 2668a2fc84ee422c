//! Shell functions that make `envon` activate in the calling shell.
//!
//! A child process cannot change its parent's environment, so each wrapper runs the
//! real executable in `--emit` mode, captures what it prints and evaluates that text in
//! the current session. Help requests and other options are passed straight through.

use crate::error::{EnvonError, Result};
use crate::shell::profile::{Shell, ShellFamily};

const POSIX_BOOTSTRAP: &str = r#"envon() {
  if [ "$#" -gt 0 ]; then
    case "$1" in
      --) shift ;;
      help|-h|--help) command envon "$@"; return $? ;;
      -*) command envon "$@"; return $? ;;
    esac
  fi
  local cmd ec
  cmd="$(command envon --emit bash -- "$@")"; ec=$?
  if [ "$ec" -ne 0 ]; then
    [ -n "$cmd" ] && printf '%s\n' "$cmd" >&2
    return "$ec"
  fi
  eval "$cmd"
}
"#;

const FISH_BOOTSTRAP: &str = r#"function envon
    if test (count $argv) -gt 0
        switch $argv[1]
            case --
                set -e argv[1]
            case help -h --help '-*'
                command envon $argv
                return $status
        end
    end
    set -l cmd (command envon --emit fish -- $argv)
    set -l ec $status
    if test $ec -ne 0
        if test (count $cmd) -gt 0
            printf '%s\n' $cmd >&2
        end
        return $ec
    end
    eval (string join \n -- $cmd)
end
"#;

// csh aliases are a single line without if/else blocks, so the branch is tracked in
// `_envon_mode`. `\envon` bypasses the alias and runs the executable.
const CSH_BOOTSTRAP: &str = r#"alias envon 'set _envon_args=(\!*:q); set _envon_mode=emit; set _envon_out=""; if ("$_envon_args" =~ "-*") set _envon_mode=pass; if ("$_envon_args" == "help" || "$_envon_args" =~ "help *") set _envon_mode=pass; if ("$_envon_args" == "--" || "$_envon_args" =~ "-- *") set _envon_mode=rest; if ($_envon_mode == rest) shift _envon_args; if ($_envon_mode == pass) \envon $_envon_args:q; if ($_envon_mode != pass) set _envon_out="`\envon --emit csh -- $_envon_args:q`"; if ("$_envon_out" != "") eval "$_envon_out"; unset _envon_args _envon_mode _envon_out'
"#;

// Nushell cannot evaluate a string, so the wrapper takes the script path out of the
// emitted `overlay use '<path>'` line and loads the overlay itself.
const NUSHELL_BOOTSTRAP: &str = r#"def --env --wrapped envon [...args] {
  mut rest = $args
  if ($rest | is-not-empty) {
    let first = ($rest | first)
    if $first == '--' {
      $rest = ($rest | skip 1)
    } else if ($first in ['help' '-h' '--help']) or ($first | str starts-with '-') {
      ^envon ...$rest
      return
    }
  }
  let res = (^envon --emit nushell -- ...$rest | complete)
  if $res.exit_code != 0 {
    print --stderr ($res.stdout + $res.stderr)
    error make { msg: $"envon exited with status ($res.exit_code)" }
  }
  let act = ($res.stdout | str trim | str replace --regex "^overlay use '(.*)'$" '$1')
  overlay use $act
}
"#;

const POWERSHELL_BOOTSTRAP: &str = r#"function envon {
  $envonExe = Get-Command envon -CommandType Application -ErrorAction SilentlyContinue | Select-Object -First 1
  if (-not $envonExe) { Write-Error 'envon executable not found on PATH'; return }
  $rest = @($args)
  if ($rest.Count -gt 0) {
    if ($rest[0] -eq '--') { $rest = @($rest | Select-Object -Skip 1) }
    elseif ($rest[0] -in @('help', '-h', '--help') -or "$($rest[0])".StartsWith('-')) {
      & $envonExe.Source @rest
      return
    }
  }
  $cmd = & $envonExe.Source --emit powershell -- @rest
  if ($LASTEXITCODE -ne 0) { Write-Error ($cmd -join "`n"); return }
  Invoke-Expression ($cmd -join "`n")
}
"#;

/// Returns the wrapper definition for `shell`.
///
/// `cmd` has no way to define a function and is rejected.
pub fn emit_bootstrap(shell: Shell) -> Result<&'static str> {
    match shell.family() {
        ShellFamily::Posix => Ok(POSIX_BOOTSTRAP),
        ShellFamily::Fish => Ok(FISH_BOOTSTRAP),
        ShellFamily::Csh => Ok(CSH_BOOTSTRAP),
        ShellFamily::Nushell => Ok(NUSHELL_BOOTSTRAP),
        ShellFamily::PowerShell => Ok(POWERSHELL_BOOTSTRAP),
        ShellFamily::Cmd => Err(EnvonError::UnsupportedShell(format!(
            "{} (no bootstrap available)",
            shell.name()
        ))),
    }
}
