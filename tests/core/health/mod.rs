/*!
Health probing tests.

Covers URL joining, single-probe classification, the cascade's early exit and
evidence ranking, batch concurrency with cancellation, and the isahc transport
against a loopback responder.
*/
