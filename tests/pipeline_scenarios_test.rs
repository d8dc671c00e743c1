//! End-to-end resolution scenarios driving real source text through all
//! three stages.

use codegraph::Language;
use codegraph::pipeline::run_on_sources;
use codegraph::resolve;

#[test]
fn inherited_method_call_resolves_to_base_class() {
    let output = run_on_sources(&[
        (
            "base.kt",
            Language::Kotlin,
            "package com.example\n\
             open class BaseService {\n\
                 fun log(msg: String) {}\n\
             }\n",
        ),
        (
            "user.kt",
            Language::Kotlin,
            "package com.example\n\
             class UserService : BaseService() {\n\
                 fun process() { log(\"x\") }\n\
             }\n",
        ),
    ]);

    let user_file = output
        .resolved
        .iter()
        .find(|f| f.file.path == "user.kt")
        .unwrap();
    assert_eq!(user_file.resolved_calls.len(), 1);
    let call = &user_file.resolved_calls[0];
    assert_eq!(call.from_fqn, "com.example.UserService.process");
    assert_eq!(call.to_fqn, "com.example.BaseService.log");
}

#[test]
fn constructor_vs_same_named_function() {
    let output = run_on_sources(&[(
        "user.kt",
        Language::Kotlin,
        "package com.example\n\
         class User(val name: String)\n\
         fun user(): String = \"no\"\n\
         fun test() {\n\
             val u = User(\"a\")\n\
             val s = user()\n\
         }\n",
    )]);

    let file = &output.resolved[0];
    let targets: Vec<&str> = file
        .resolved_calls
        .iter()
        .map(|c| c.to_fqn.as_str())
        .collect();
    assert_eq!(targets, vec!["com.example.User.<init>", "com.example.user"]);
}

#[test]
fn overloads_discriminate_by_arity() {
    let output = run_on_sources(&[(
        "calc.kt",
        Language::Kotlin,
        "package com.example\n\
         class Calculator {\n\
             fun add(a: Int): Int = a\n\
             fun add(a: Int, b: Int): Int = a + b\n\
             fun add(a: Int, b: Int, c: Int): Int = a + b + c\n\
         }\n\
         class UseSite {\n\
             val calc: Calculator = Calculator()\n\
             fun go() {\n\
                 calc.add(1)\n\
                 calc.add(1, 2)\n\
                 calc.add(1, 2, 3)\n\
             }\n\
         }\n",
    )]);

    let file = &output.resolved[0];
    let add_calls: Vec<_> = file
        .resolved_calls
        .iter()
        .filter(|c| c.to_fqn == "com.example.Calculator.add")
        .collect();
    assert_eq!(add_calls.len(), 3);
    assert!(
        add_calls
            .iter()
            .all(|c| c.from_fqn == "com.example.UseSite.go")
    );
}

#[test]
fn type_alias_follows_through_to_target() {
    let output = run_on_sources(&[(
        "alias.kt",
        Language::Kotlin,
        "package com.example\n\
         class UserList {\n\
             fun add(user: String) {}\n\
         }\n\
         typealias Users = UserList\n\
         fun process(users: Users) {\n\
             users.add(\"x\")\n\
         }\n",
    )]);

    let file = &output.resolved[0];
    assert_eq!(file.resolved_calls.len(), 1);
    assert_eq!(file.resolved_calls[0].to_fqn, "com.example.UserList.add");
}

#[test]
fn qualified_external_call_resolves_by_fqn() {
    let output = run_on_sources(&[
        (
            "utils.kt",
            Language::Kotlin,
            "package com.example.utils\n\
             object StringUtils {\n\
                 fun format(s: String): String = s\n\
             }\n",
        ),
        (
            "caller.kt",
            Language::Kotlin,
            "package com.example\n\
             fun go() {\n\
                 com.example.utils.StringUtils.format(\"x\")\n\
             }\n",
        ),
    ]);

    let caller = output
        .resolved
        .iter()
        .find(|f| f.file.path == "caller.kt")
        .unwrap();
    assert_eq!(caller.resolved_calls.len(), 1);
    assert_eq!(
        caller.resolved_calls[0].to_fqn,
        "com.example.utils.StringUtils.format"
    );
}

#[test]
fn unresolved_calls_are_counted_not_raised() {
    let output = run_on_sources(&[(
        "s.kt",
        Language::Kotlin,
        "package com.example\n\
         class H {\n\
             fun help() {}\n\
         }\n\
         class S {\n\
             val h = H()\n\
             fun go() {\n\
                 h.help()\n\
                 unknown()\n\
             }\n\
         }\n",
    )]);

    let stats = resolve::stats(&output.resolved);
    assert_eq!(stats.total, 2);
    assert_eq!(stats.resolved, 1);
    assert_eq!(stats.unresolved, 1);

    let file = &output.resolved[0];
    assert_eq!(file.resolved_calls[0].to_fqn, "com.example.H.help");
    let unresolved = file.unresolved_calls();
    assert_eq!(unresolved.len(), 1);
    assert_eq!(unresolved[0].name, "unknown");
}

#[test]
fn safe_call_resolves_like_a_normal_call() {
    let output = run_on_sources(&[(
        "safe.kt",
        Language::Kotlin,
        "package p\n\
         class User {\n\
             fun refresh() {}\n\
         }\n\
         fun go(user: User?) {\n\
             user?.refresh()\n\
         }\n",
    )]);

    let file = &output.resolved[0];
    assert_eq!(file.resolved_calls.len(), 1);
    assert_eq!(file.resolved_calls[0].to_fqn, "p.User.refresh");
}

#[test]
fn companion_method_resolves_through_class_name() {
    let output = run_on_sources(&[(
        "widget.kt",
        Language::Kotlin,
        "package p\n\
         class Widget {\n\
             companion object {\n\
                 fun create(): Widget = Widget()\n\
             }\n\
         }\n\
         fun go() {\n\
             Widget.create()\n\
         }\n",
    )]);

    let file = &output.resolved[0];
    let create = file
        .resolved_calls
        .iter()
        .find(|c| c.from_fqn == "p.go")
        .unwrap();
    assert_eq!(create.to_fqn, "p.Widget.Companion.create");

    // The constructor call inside the companion resolves too.
    assert!(
        file.resolved_calls
            .iter()
            .any(|c| c.from_fqn == "p.Widget.Companion.create"
                && c.to_fqn == "p.Widget.<init>")
    );
}

#[test]
fn extension_function_matches_receiver_type() {
    let output = run_on_sources(&[(
        "ext.kt",
        Language::Kotlin,
        "package p\n\
         fun Int.squared(): Int = this * this\n\
         fun go() {\n\
             val n: Int = 3\n\
             n.squared()\n\
         }\n",
    )]);

    let file = &output.resolved[0];
    assert_eq!(file.resolved_calls.len(), 1);
    assert_eq!(file.resolved_calls[0].to_fqn, "p.squared");
}

#[test]
fn stdlib_is_the_last_resort() {
    let output = run_on_sources(&[(
        "io.kt",
        Language::Kotlin,
        "package p\n\
         fun go() {\n\
             println(\"hello\")\n\
             val xs = listOf(1, 2)\n\
         }\n",
    )]);

    let file = &output.resolved[0];
    let targets: Vec<&str> = file
        .resolved_calls
        .iter()
        .map(|c| c.to_fqn.as_str())
        .collect();
    assert!(targets.contains(&"kotlin.io.println"));
    assert!(targets.contains(&"kotlin.collections.listOf"));
}
