//! Readers for the option and extension sections.
//!
//! Each returns how many keys it applied; absent keys leave the current value.

use toml::Table;

use super::read::{read_bool, read_double, read_int, read_string};
use super::types::{Extensions, Options};

/// Top-level keys plus `[simulator]`.
pub fn read_general(options: &mut Options, t: &Table) -> usize {
    let sim = Some("simulator");
    [
        read_bool(&mut options.print_terminal, t, None, "print_terminal"),
        read_double(&mut options.binsearch_accuracy, t, None, "binsearch_accuracy"),
        read_string(&mut options.spice_call_name, t, sim, "command"),
        read_bool(&mut options.spice_verbose, t, sim, "verbose"),
        read_int(&mut options.threads, t, sim, "threads"),
        read_int(&mut options.max_subprocesses, t, sim, "max_subprocesses"),
    ]
    .into_iter()
    .filter(|&applied| applied)
    .count()
}

pub fn read_extensions(extensions: &mut Extensions, t: &Table) -> usize {
    let ext = Some("extensions");
    [
        read_string(&mut extensions.circuit, t, ext, "circuit"),
        read_string(&mut extensions.param, t, ext, "parameters"),
        read_string(&mut extensions.passf, t, ext, "passfail"),
        read_string(&mut extensions.envelope, t, ext, "envelope"),
        read_string(&mut extensions.plot, t, ext, "plot"),
        read_string(&mut extensions.env_call, t, ext, "env_call"),
    ]
    .into_iter()
    .filter(|&applied| applied)
    .count()
}

pub fn read_define(options: &mut Options, t: &Table) -> usize {
    let define = Some("define");
    usize::from(read_bool(&mut options.d_simulate, t, define, "simulate"))
        + usize::from(read_bool(&mut options.d_envelope, t, define, "envelope"))
}

pub fn read_yield(options: &mut Options, t: &Table) -> usize {
    let y = Some("yield");
    [
        read_int(&mut options.y_search_depth, t, y, "search_depth"),
        read_int(&mut options.y_search_width, t, y, "search_width"),
        read_int(&mut options.y_search_steps, t, y, "search_steps"),
        read_int(&mut options.y_max_mem_k, t, y, "max_mem_k"),
        read_double(&mut options.y_accuracy, t, y, "accuracy"),
        read_int(&mut options.y_print_every, t, y, "print_every"),
    ]
    .into_iter()
    .filter(|&applied| applied)
    .count()
}

pub fn read_optimize(options: &mut Options, t: &Table) -> usize {
    let optimize = Some("optimize");
    usize::from(read_int(&mut options.o_min_iter, t, optimize, "min_iter"))
        + usize::from(read_int(&mut options.o_max_mem_k, t, optimize, "max_mem_k"))
}

/// `[xy].iterations`; the sweep list itself is merged with the other entities.
pub fn read_xy(options: &mut Options, t: &Table) -> usize {
    usize::from(read_int(&mut options.xy_iter, t, Some("xy"), "iterations"))
}
