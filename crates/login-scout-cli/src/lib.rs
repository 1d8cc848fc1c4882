// Copyright 2026 Login Scout Contributors
// SPDX-License-Identifier: Apache-2.0

//! Front ends for login-scout: the CLI subcommands and the REST API.

pub mod cli;
pub mod rest;
