mod common;

#[cfg(test)]
mod interpreter_tests {
    use super::common::{
        on_large_stack, run_ok, runtime_error, runtime_errors, session, static_errors,
    };

    use rox::interpreter::MAX_CALL_DEPTH;

    #[test]
    fn test_arithmetic_and_concatenation() {
        assert_eq!(run_ok("print 1 + 2 * 3;"), "7\n");
        assert_eq!(run_ok("print (1 + 2) * 3;"), "9\n");
        assert_eq!(run_ok("print 7 / 2;"), "3.5\n");
        assert_eq!(run_ok("print -(4 - 6);"), "2\n");
        assert_eq!(run_ok("print \"a\" + \"b\";"), "ab\n");
    }

    #[test]
    fn test_division_by_zero_follows_ieee() {
        assert_eq!(run_ok("print 1 / 0 > 1000000;"), "true\n");
        assert_eq!(run_ok("var n = 0 / 0; print n == n;"), "false\n");
    }

    #[test]
    fn test_value_display() {
        assert_eq!(
            run_ok("print nil; print true; print 3.25; print 10;"),
            "nil\ntrue\n3.25\n10\n"
        );
    }

    #[test]
    fn test_truthiness() {
        let source = r#"
            if (0) print "zero";
            if ("") print "empty";
            if (nil) print "nil"; else print "nil is falsy";
            if (false) print "false"; else print "false is falsy";
            print !nil;
        "#;

        assert_eq!(
            run_ok(source),
            "zero\nempty\nnil is falsy\nfalse is falsy\ntrue\n"
        );
    }

    #[test]
    fn test_logical_operators_return_operands() {
        assert_eq!(
            run_ok("print nil or \"x\"; print 1 and 2; print false and 1; print 1 or 2;"),
            "x\n2\nfalse\n1\n"
        );
    }

    #[test]
    fn test_logical_operators_short_circuit() {
        let source = r#"
            var calls = 0;
            fun touch() { calls = calls + 1; return true; }
            print false and touch();
            print true or touch();
            print calls;
        "#;

        assert_eq!(run_ok(source), "false\ntrue\n0\n");
    }

    #[test]
    fn test_equality_has_no_coercion() {
        assert_eq!(
            run_ok("print 1 == 1; print \"a\" == \"a\"; print nil == false; print 1 == \"1\"; print nil == nil;"),
            "true\ntrue\nfalse\nfalse\ntrue\n"
        );
    }

    #[test]
    fn test_type_errors() {
        let (_, error) = runtime_error("print 1 + \"a\";");
        assert_eq!(
            error.message(),
            "Operands of '+' must be two numbers or two strings."
        );

        let (_, error) = runtime_error("print 1 < \"a\";");
        assert_eq!(error.message(), "Operands of '<' must be numbers.");
    }

    #[test]
    fn test_runtime_error_aborts_only_its_statement() {
        let (output, error) = runtime_error("print 1;\nprint -\"x\";\nprint 2;");

        assert_eq!(output, "1\n2\n");
        assert_eq!(error.to_string(), "Operand of '-' must be a number.\n[line 2]");
    }

    #[test]
    fn test_every_runtime_error_is_reported() {
        let source = r#"
            var a = 1;
            print missing;
            a = a + 1;
            print a + "x";
            print a;
        "#;

        let (output, errors) = runtime_errors(source);
        let messages: Vec<String> = errors.iter().map(|e| e.message()).collect();

        assert_eq!(output, "2\n");
        assert_eq!(
            messages,
            vec![
                "Undefined variable 'missing'.",
                "Operands of '+' must be two numbers or two strings.",
            ]
        );
    }

    #[test]
    fn test_error_inside_call_restores_global_scope() {
        let source = r#"
            var x = "global";
            fun fail(x) {
                print x;
                return x - 1;
            }
            fail("local");
            print x;
        "#;

        let (output, error) = runtime_error(source);
        assert_eq!(output, "local\nglobal\n");
        assert_eq!(error.message(), "Operands of '-' must be numbers.");
    }

    #[test]
    fn test_unbounded_recursion_is_a_runtime_error() {
        let source = r#"
            fun forever(n) {
                return forever(n + 1);
            }
            fun depth(n) {
                if (n == 0) return 0;
                return 1 + depth(n - 1);
            }
            forever(0);
            print depth(10);
        "#;

        let (output, errors) = on_large_stack(move || runtime_errors(source));

        assert_eq!(output, "10\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message(), "Stack overflow.");
        assert_eq!(errors[0].line(), Some(3));
    }

    #[test]
    fn test_recursion_below_the_depth_limit() {
        let source = format!(
            "fun depth(n) {{ if (n == 0) return 0; return 1 + depth(n - 1); }} print depth({});",
            MAX_CALL_DEPTH - 1
        );

        let output = on_large_stack(move || run_ok(&source));
        assert_eq!(output, format!("{}\n", MAX_CALL_DEPTH - 1));
    }

    #[test]
    fn test_recursive_initializers_hit_the_depth_limit() {
        let source = "class Node { init() { this.next = Node(); } }\nNode();";

        let (_, error) = on_large_stack(move || runtime_error(source));
        assert_eq!(error.message(), "Stack overflow.");
    }

    #[test]
    fn test_block_scoping_and_shadowing() {
        let source = r#"
            var a = "global a";
            var b = "global b";
            {
                var a = "outer a";
                {
                    var a = "inner a";
                    print a;
                    print b;
                }
                print a;
            }
            print a;
        "#;

        assert_eq!(
            run_ok(source),
            "inner a\nglobal b\nouter a\nglobal a\n"
        );
    }

    #[test]
    fn test_while_and_for_loops() {
        assert_eq!(
            run_ok("var i = 0; while (i < 3) { print i; i = i + 1; }"),
            "0\n1\n2\n"
        );
        assert_eq!(
            run_ok("for (var i = 0; i < 3; i = i + 1) print i;"),
            "0\n1\n2\n"
        );
    }

    #[test]
    fn test_return_from_inside_loop() {
        let source = r#"
            fun firstOver(limit) {
                for (var i = 0; ; i = i + 1) {
                    if (i > limit) return i;
                }
            }
            print firstOver(4);
        "#;

        assert_eq!(run_ok(source), "5\n");
    }

    #[test]
    fn test_recursion() {
        let source = r#"
            fun fib(n) {
                if (n < 2) return n;
                return fib(n - 1) + fib(n - 2);
            }
            print fib(15);
        "#;

        assert_eq!(run_ok(source), "610\n");
    }

    #[test]
    fn test_closure_counter() {
        let source = r#"
            fun makeCounter() {
                var i = 0;
                fun count() {
                    i = i + 1;
                    return i;
                }
                return count;
            }

            var c = makeCounter();
            print c();
            print c();

            var d = makeCounter();
            print d();
        "#;

        assert_eq!(run_ok(source), "1\n2\n1\n");
    }

    #[test]
    fn test_function_without_return_yields_nil() {
        assert_eq!(run_ok("fun f() {} print f();"), "nil\n");
    }

    #[test]
    fn test_callable_display() {
        assert_eq!(
            run_ok("fun f() {} class K {} print f; print K; print K(); print clock;"),
            "<fn f>\nK\nK instance\n<native fn>\n"
        );
    }

    #[test]
    fn test_clock_native() {
        assert_eq!(run_ok("print clock() > 0;"), "true\n");
    }

    #[test]
    fn test_call_errors() {
        let (_, error) = runtime_error("fun f() {}\nf(1);");
        assert_eq!(error.message(), "Expected 0 arguments but got 1.");
        assert_eq!(error.line(), Some(2));

        let (_, error) = runtime_error("\"s\"();");
        assert_eq!(
            error.message(),
            "Can only call functions and classes, not string."
        );
    }

    #[test]
    fn test_undefined_variable() {
        let (_, error) = runtime_error("print nope;");
        assert_eq!(error.message(), "Undefined variable 'nope'.");

        let (_, error) = runtime_error("nope = 1;");
        assert_eq!(error.message(), "Undefined variable 'nope'.");
    }

    #[test]
    fn test_classes_fields_and_methods() {
        let source = r#"
            class Point {
                init(x, y) {
                    this.x = x;
                    this.y = y;
                }

                sum() {
                    return this.x + this.y;
                }
            }

            var p = Point(1, 2);
            print p.sum();
            p.x = 10;
            print p.sum();
        "#;

        assert_eq!(run_ok(source), "3\n12\n");
    }

    #[test]
    fn test_bound_methods_remember_this() {
        let source = r#"
            class A {
                init() { this.n = "a"; }
                get() { return this.n; }
            }

            var m = A().get;
            print m();
        "#;

        assert_eq!(run_ok(source), "a\n");
    }

    #[test]
    fn test_super_calls_superclass_method() {
        let source = r#"
            class A {
                method() { return "A"; }
            }

            class B < A {
                method() { return super.method() + "B"; }
            }

            print B().method();
        "#;

        assert_eq!(run_ok(source), "AB\n");
    }

    #[test]
    fn test_inherited_methods_and_initializer() {
        let source = r#"
            class A {
                init(x) { this.x = x; }
                twice() { return this.x * 2; }
            }

            class B < A {}

            print B(4).twice();
        "#;

        assert_eq!(run_ok(source), "8\n");
    }

    #[test]
    fn test_initializer_returns_instance() {
        let source = r#"
            class C {
                init() {
                    this.v = 1;
                    return;
                }
            }

            var c = C();
            print c.v;
            print c.init();
        "#;

        assert_eq!(run_ok(source), "1\nC instance\n");
    }

    #[test]
    fn test_property_errors() {
        let (_, error) = runtime_error("class A {}\nprint A().x;");
        assert_eq!(error.message(), "Undefined property 'x'.");

        let (_, error) = runtime_error("var s = 1; print s.x;");
        assert_eq!(error.message(), "Only instances have properties.");

        let (_, error) = runtime_error("var s = 1; s.x = 2;");
        assert_eq!(error.message(), "Only instances have fields.");
    }

    #[test]
    fn test_superclass_must_be_a_class() {
        let (_, error) = runtime_error("var NotClass = 1;\nclass B < NotClass {}");
        assert_eq!(error.message(), "Superclass must be a class.");
        assert_eq!(error.line(), Some(2));
    }

    #[test]
    fn test_session_keeps_globals_between_runs() {
        let (mut lox, buffer) = session();

        lox.run("var a = 1;").expect("declaration");
        lox.run("print a + 1;").expect("use");

        // A runtime error aborts only its own unit.
        assert!(lox.run("a = 5; print missing;").is_err());
        lox.run("print a;").expect("state survives errors");

        assert_eq!(buffer.contents(), "2\n5\n");
    }

    #[test]
    fn test_session_echoes_trailing_expression() {
        let (mut lox, buffer) = session();

        lox.run("1 + 2").expect("implicit print");
        lox.run("fun f() { return \"hi\"; }").expect("declaration");
        lox.run("f()").expect("implicit print of a call");

        assert_eq!(buffer.contents(), "3\nhi\n");
    }

    #[test]
    fn test_lex_and_parse_errors_are_reported_together() {
        assert_eq!(
            static_errors("var x = @;"),
            vec!["Unexpected character: @", "Expect expression."]
        );
    }
}
