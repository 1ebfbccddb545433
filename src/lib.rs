//! Scrutari is a differential test oracle for abstract argumentation solvers and dDNNF compilers.

#![warn(missing_docs)]

pub mod aa;

pub mod app;

pub mod checking;

pub mod cnf;

pub mod ddnnf;

pub mod decoding;

pub mod exec;

pub mod generation;

pub mod io;

pub mod oracle;
