/*! Test coverage for the analysis model.
 *
 * Models arrive from external analyzers, so decoding and validation have to reject anything whose
 * references do not resolve. These tests cover the builders, JSON interchange and validation.
 */
