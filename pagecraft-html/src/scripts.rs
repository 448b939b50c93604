//! Shared browser runtime.
//!
//! Component markup never calls into the runtime directly. Each renderer
//! emits a one-line inline script that queues `[handler, config]` on
//! `window.__pcq`; the assembler appends the shared handlers a page needs
//! (each exactly once) and then `pagecraft.boot()`, which drains the queue.
//! After boot the queue dispatches immediately, so overlays placed after the
//! runtime still initialise.

use crate::escape;
use serde::Serialize;
use std::collections::BTreeSet;

/// A runtime chunk with optional CSS, emitted at most once per document.
/// Ordering is emission order; `Core` must come first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SharedScript {
    Core,
    FormValidation,
    FormConditions,
    Accordion,
    Tabs,
    PopUp,
    Poll,
    Countdown,
    Upload,
    AddToCalendar,
    FloatingButton,
    CookieBanner,
}

impl SharedScript {
    pub fn name(&self) -> &'static str {
        match self {
            SharedScript::Core => "core",
            SharedScript::FormValidation => "form-validation",
            SharedScript::FormConditions => "form-conditions",
            SharedScript::Accordion => "accordion",
            SharedScript::Tabs => "tabs",
            SharedScript::PopUp => "popup",
            SharedScript::Poll => "poll",
            SharedScript::Countdown => "countdown",
            SharedScript::Upload => "upload",
            SharedScript::AddToCalendar => "add-to-calendar",
            SharedScript::FloatingButton => "floating-button",
            SharedScript::CookieBanner => "cookie-banner",
        }
    }

    pub fn js(&self) -> &'static str {
        match self {
            SharedScript::Core => CORE_JS,
            SharedScript::FormValidation => FORM_VALIDATION_JS,
            SharedScript::FormConditions => FORM_CONDITIONS_JS,
            SharedScript::Accordion => ACCORDION_JS,
            SharedScript::Tabs => TABS_JS,
            SharedScript::PopUp => POPUP_JS,
            SharedScript::Poll => POLL_JS,
            SharedScript::Countdown => COUNTDOWN_JS,
            SharedScript::Upload => UPLOAD_JS,
            SharedScript::AddToCalendar => CALENDAR_JS,
            SharedScript::FloatingButton => FLOATING_BUTTON_JS,
            SharedScript::CookieBanner => COOKIE_BANNER_JS,
        }
    }

    pub fn css(&self) -> &'static str {
        match self {
            SharedScript::Core => "",
            SharedScript::FormValidation => FORM_CSS,
            SharedScript::FormConditions => "",
            SharedScript::Accordion => ACCORDION_CSS,
            SharedScript::Tabs => TABS_CSS,
            SharedScript::PopUp => POPUP_CSS,
            SharedScript::Poll => POLL_CSS,
            SharedScript::Countdown => COUNTDOWN_CSS,
            SharedScript::Upload => UPLOAD_CSS,
            SharedScript::AddToCalendar => CALENDAR_CSS,
            SharedScript::FloatingButton => FLOATING_BUTTON_CSS,
            SharedScript::CookieBanner => COOKIE_BANNER_CSS,
        }
    }
}

/// Ordered, deduplicated set of shared scripts, local to one compile
#[derive(Debug, Clone, Default)]
pub struct ScriptSet {
    scripts: BTreeSet<SharedScript>,
}

impl ScriptSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(&mut self, script: SharedScript) {
        if self.scripts.insert(script) {
            tracing::trace!(script = script.name(), "shared script required");
        }
    }

    pub fn extend(&mut self, scripts: impl IntoIterator<Item = SharedScript>) {
        for script in scripts {
            self.require(script);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    pub fn contains(&self, script: SharedScript) -> bool {
        self.scripts.contains(&script)
    }

    pub fn iter(&self) -> impl Iterator<Item = SharedScript> + '_ {
        self.scripts.iter().copied()
    }

    /// CSS of every required script, in order
    pub fn css(&self, minify: bool) -> String {
        let css: String = self.iter().map(|s| s.css()).collect();
        if minify {
            minify_source(&css)
        } else {
            css
        }
    }

    /// The runtime `<script>` element. Core is always included when anything
    /// else is, and the element ends with the boot call.
    pub fn runtime(&self, minify: bool) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let mut js = String::from(CORE_JS);
        for script in self.iter().filter(|s| *s != SharedScript::Core) {
            js.push_str(script.js());
        }
        js.push_str("pagecraft.boot();\n");
        let js = if minify { minify_source(&js) } else { js };
        Some(format!("<script data-pagecraft-runtime>\n{}</script>", js))
    }
}

/// Inline script queueing `config` for the named runtime handler
pub fn enqueue<T: Serialize + ?Sized>(handler: &str, config: &T) -> String {
    format!(
        "<script>(window.__pcq=window.__pcq||[]).push([{},{}]);</script>",
        escape::js_string(handler),
        escape::js_value(config)
    )
}

/// Trim indentation and drop blank and `//` comment lines
pub fn minify_source(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    for line in source.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

const CORE_JS: &str = r#"(function (w) {
  var pc = w.pagecraft = w.pagecraft || {};
  var handlers = {};
  pc.register = function (name, fn) { handlers[name] = fn; };
  pc.ready = function (fn) {
    if (document.readyState === "loading") document.addEventListener("DOMContentLoaded", fn);
    else fn();
  };
  pc.attr = function (s) { return String(s).replace(/["\\]/g, "\\$&"); };
  pc.store = function (kind, key, value) {
    try {
      var s = kind === "session" ? w.sessionStorage : w.localStorage;
      if (value === undefined) return s.getItem(key);
      s.setItem(key, value);
    } catch (e) {}
    return null;
  };
  function run(entry) {
    var fn = handlers[entry[0]];
    if (!fn) return;
    try { fn(entry[1] || {}); } catch (err) { if (w.console) console.error("pagecraft", entry[0], err); }
  }
  pc.boot = function () {
    var queued = w.__pcq || [];
    w.__pcq = { push: run };
    for (var i = 0; i < queued.length; i++) run(queued[i]);
  };
})(window);
"#;

const FORM_VALIDATION_JS: &str = r#"pagecraft.register("validation", function (cfg) {
  var form = document.getElementById(cfg.form);
  if (!form) return;
  var emailRe = /^[^\s@]+@[^\s@]+\.[^\s@]+$/;
  var phoneRe = /^[+()0-9 .-]{6,}$/;
  function message(wrap, text) {
    var slot = wrap.querySelector(".pc-field-error");
    if (slot) slot.textContent = text || "";
    wrap.classList.toggle("pc-invalid", !!text);
  }
  function check(wrap) {
    if (wrap.hidden) return true;
    var inputs = wrap.querySelectorAll("input,select,textarea");
    if (!inputs.length || inputs[0].disabled) return true;
    var type = wrap.getAttribute("data-type");
    var required = wrap.hasAttribute("data-required");
    var value = "";
    if (type === "radio") {
      for (var i = 0; i < inputs.length; i++) if (inputs[i].checked) value = inputs[i].value;
    } else if (type === "checkbox") {
      value = inputs[0].checked ? "true" : "";
    } else {
      value = inputs[0].value.trim();
    }
    if (required && !value) { message(wrap, cfg.requiredText); return false; }
    if (value && type === "email" && !emailRe.test(value)) { message(wrap, cfg.emailText); return false; }
    if (value && type === "phone" && !phoneRe.test(value)) { message(wrap, cfg.phoneText); return false; }
    message(wrap, "");
    return true;
  }
  form.addEventListener("submit", function (ev) {
    var ok = true;
    var wraps = form.querySelectorAll("[data-field]");
    for (var i = 0; i < wraps.length; i++) if (!check(wraps[i])) ok = false;
    if (!ok) {
      ev.preventDefault();
      var first = form.querySelector(".pc-invalid input,.pc-invalid select,.pc-invalid textarea");
      if (first) first.focus();
    }
  });
  form.addEventListener("change", function (ev) {
    var wrap = ev.target.closest && ev.target.closest("[data-field]");
    if (wrap && wrap.classList.contains("pc-invalid")) check(wrap);
  });
});
"#;

const FORM_CONDITIONS_JS: &str = r#"pagecraft.register("conditions", function (cfg) {
  var form = document.getElementById(cfg.form);
  if (!form || !cfg.rules || !cfg.rules.length) return;
  function wrap(id) { return form.querySelector('[data-field="' + pagecraft.attr(id) + '"]'); }
  function valueOf(id) {
    var el = wrap(id);
    if (!el || el.hidden) return null;
    var inputs = el.querySelectorAll("input,select,textarea");
    if (!inputs.length) return null;
    var type = el.getAttribute("data-type");
    if (type === "checkbox") return inputs[0].checked ? "true" : "false";
    if (type === "radio") {
      for (var i = 0; i < inputs.length; i++) if (inputs[i].checked) return inputs[i].value;
      return "";
    }
    return inputs[0].value;
  }
  function setShown(el, shown) {
    el.hidden = !shown;
    var inputs = el.querySelectorAll("input,select,textarea");
    for (var i = 0; i < inputs.length; i++) {
      if (!shown && !inputs[i].disabled) { inputs[i].disabled = true; inputs[i].setAttribute("data-pc-disabled", ""); }
      if (shown && inputs[i].hasAttribute("data-pc-disabled")) { inputs[i].disabled = false; inputs[i].removeAttribute("data-pc-disabled"); }
    }
  }
  function apply() {
    // rules can chain; settle within one pass per rule
    for (var pass = 0; pass <= cfg.rules.length; pass++) {
      var changed = false;
      for (var i = 0; i < cfg.rules.length; i++) {
        var rule = cfg.rules[i];
        var el = wrap(rule.field);
        if (!el) continue;
        var shown = valueOf(rule.dependsOn) === String(rule.value);
        if (el.hidden === shown) { setShown(el, shown); changed = true; }
      }
      if (!changed) break;
    }
  }
  pagecraft.ready(apply);
  form.addEventListener("input", apply);
  form.addEventListener("change", apply);
});
"#;

const ACCORDION_JS: &str = r#"pagecraft.register("accordion", function (cfg) {
  var root = document.getElementById(cfg.el);
  if (!root) return;
  var triggers = root.querySelectorAll(".pc-accordion-trigger");
  function set(btn, open) {
    btn.setAttribute("aria-expanded", open ? "true" : "false");
    var panel = document.getElementById(btn.getAttribute("aria-controls"));
    if (panel) panel.hidden = !open;
  }
  for (var i = 0; i < triggers.length; i++) {
    triggers[i].addEventListener("click", function () {
      var open = this.getAttribute("aria-expanded") !== "true";
      if (open && !cfg.multiple) for (var j = 0; j < triggers.length; j++) set(triggers[j], false);
      set(this, open);
    });
  }
});
"#;

const TABS_JS: &str = r#"pagecraft.register("tabs", function (cfg) {
  var root = document.getElementById(cfg.el);
  if (!root) return;
  var tabs = root.querySelectorAll('[role="tab"]');
  function select(index) {
    for (var i = 0; i < tabs.length; i++) {
      var on = i === index;
      tabs[i].setAttribute("aria-selected", on ? "true" : "false");
      tabs[i].tabIndex = on ? 0 : -1;
      var panel = document.getElementById(tabs[i].getAttribute("aria-controls"));
      if (panel) panel.hidden = !on;
    }
  }
  for (var i = 0; i < tabs.length; i++) {
    (function (index) {
      tabs[index].addEventListener("click", function () { select(index); });
      tabs[index].addEventListener("keydown", function (ev) {
        var next = ev.key === "ArrowRight" ? index + 1 : ev.key === "ArrowLeft" ? index - 1 : null;
        if (next === null) return;
        next = (next + tabs.length) % tabs.length;
        select(next);
        tabs[next].focus();
      });
    })(i);
  }
});
"#;

const POPUP_JS: &str = r#"pagecraft.register("popup", function (cfg) {
  var el = document.getElementById(cfg.el);
  if (!el) return;
  var key = "pagecraft:popup:" + cfg.el;
  var shown = false;
  function open() {
    if (shown && cfg.trigger !== "click") return;
    if (cfg.once && cfg.trigger !== "click" && pagecraft.store("local", key)) return;
    shown = true;
    el.hidden = false;
    el.classList.add("pc-popup-open");
    if (cfg.once) pagecraft.store("local", key, "1");
  }
  function close() { el.hidden = true; el.classList.remove("pc-popup-open"); }
  var closers = el.querySelectorAll("[data-pc-close]");
  for (var i = 0; i < closers.length; i++) closers[i].addEventListener("click", close);
  el.addEventListener("click", function (ev) { if (ev.target === el) close(); });
  document.addEventListener("keydown", function (ev) { if (ev.key === "Escape") close(); });
  if (cfg.trigger === "onLoad") pagecraft.ready(open);
  else if (cfg.trigger === "delay") setTimeout(open, (cfg.delay || 0) * 1000);
  else if (cfg.trigger === "exitIntent") document.addEventListener("mouseout", function (ev) { if (!ev.relatedTarget && ev.clientY <= 0) open(); });
  else if (cfg.trigger === "scroll") window.addEventListener("scroll", function () {
    var max = document.documentElement.scrollHeight - window.innerHeight;
    if (max > 0 && (window.scrollY / max) * 100 >= (cfg.scroll || 0)) open();
  }, { passive: true });
  var openers = document.querySelectorAll('[data-pc-open="' + pagecraft.attr(cfg.el) + '"]');
  for (var j = 0; j < openers.length; j++) openers[j].addEventListener("click", function (ev) { ev.preventDefault(); open(); });
});
"#;

const POLL_JS: &str = r#"pagecraft.register("poll", function (cfg) {
  var form = document.getElementById(cfg.el);
  if (!form) return;
  var key = "pagecraft:poll:" + cfg.el;
  var thanks = form.querySelector(".pc-poll-thanks");
  function done() {
    form.classList.add("pc-poll-done");
    if (thanks) thanks.hidden = false;
    var buttons = form.querySelectorAll("button");
    for (var i = 0; i < buttons.length; i++) buttons[i].disabled = true;
  }
  if (pagecraft.store("local", key)) { done(); return; }
  form.addEventListener("submit", function (ev) {
    if (!window.fetch || !window.FormData) return;
    ev.preventDefault();
    var data = new FormData(form);
    var choice = ev.submitter;
    if (choice && choice.name) data.append(choice.name, choice.value);
    fetch(form.getAttribute("action") || window.location.href, { method: "POST", body: data, credentials: "same-origin" })
      .catch(function () {});
    pagecraft.store("local", key, "1");
    done();
  });
});
"#;

const COUNTDOWN_JS: &str = r#"pagecraft.register("countdown", function (cfg) {
  var el = document.getElementById(cfg.el);
  if (!el) return;
  var target = new Date(cfg.target).getTime();
  var units = { days: 86400, hours: 3600, minutes: 60, seconds: 1 };
  var timer = null;
  function expire() {
    if (timer) clearInterval(timer);
    var clock = el.querySelector(".pc-countdown-clock");
    var over = el.querySelector(".pc-countdown-expired");
    if (clock) clock.hidden = true;
    if (over) over.hidden = false;
  }
  function tick() {
    var left = Math.floor((target - Date.now()) / 1000);
    if (isNaN(left) || left <= 0) { expire(); return; }
    for (var unit in units) {
      var slot = el.querySelector('[data-unit="' + unit + '"]');
      var value = Math.floor(left / units[unit]);
      left -= value * units[unit];
      if (slot) slot.textContent = value < 10 ? "0" + value : String(value);
    }
  }
  tick();
  timer = setInterval(tick, 1000);
});
"#;

const UPLOAD_JS: &str = r#"(function () {
  function send(cfg, makeRequest, attempt) {
    attempt = attempt || 0;
    var ctrl = window.AbortController ? new AbortController() : null;
    var timer = ctrl ? setTimeout(function () { ctrl.abort(); }, cfg.timeoutMs) : null;
    return fetch(cfg.endpoint, makeRequest(ctrl ? ctrl.signal : undefined)).then(function (res) {
      if (timer) clearTimeout(timer);
      if (!res.ok) throw new Error("HTTP " + res.status);
      return res;
    }).catch(function (err) {
      if (timer) clearTimeout(timer);
      if (attempt >= cfg.retries) throw err;
      return new Promise(function (r) { setTimeout(r, 1000 * Math.pow(2, attempt)); })
        .then(function () { return send(cfg, makeRequest, attempt + 1); });
    });
  }
  function stamp(template, fallback) {
    if (!template) return fallback;
    var d = new Date();
    var ymd = d.getFullYear() + ("0" + (d.getMonth() + 1)).slice(-2) + ("0" + d.getDate()).slice(-2);
    return template.replace(/\x25\x25Date\x25\x25/gi, ymd);
  }
  function parseCsv(text, delim) {
    var rows = [], row = [], cell = "", quoted = false;
    for (var i = 0; i < text.length; i++) {
      var ch = text[i];
      if (quoted) {
        if (ch === '"' && text[i + 1] === '"') { cell += '"'; i++; }
        else if (ch === '"') quoted = false;
        else cell += ch;
      } else if (ch === '"') quoted = true;
      else if (ch === delim) { row.push(cell); cell = ""; }
      else if (ch === "\n" || ch === "\r") {
        if (ch === "\r" && text[i + 1] === "\n") i++;
        row.push(cell); cell = "";
        if (row.length > 1 || row[0] !== "") rows.push(row);
        row = [];
      } else cell += ch;
    }
    row.push(cell);
    if (row.length > 1 || row[0] !== "") rows.push(row);
    return rows;
  }
  function widget(cfg) {
    var root = document.getElementById(cfg.el);
    if (!root) return null;
    var q = function (sel) { return root.querySelector(sel); };
    return {
      root: root,
      select: q(".pc-upload-target"),
      file: q('input[type="file"]'),
      button: q(".pc-upload-submit"),
      status: q(".pc-upload-status"),
      step: function (n) { root.setAttribute("data-step", String(n)); },
      say: function (text, kind) {
        if (!this.status) return;
        this.status.textContent = text;
        this.status.className = "pc-upload-status" + (kind ? " pc-upload-" + kind : "");
      },
      target: function () {
        var i = this.select ? parseInt(this.select.value, 10) : 0;
        return isNaN(i) ? null : cfg.targets[i] || null;
      }
    };
  }
  function wire(w, run) {
    if (w.select) w.select.addEventListener("change", function () { w.step(w.target() ? 2 : 1); });
    if (w.file) w.file.addEventListener("change", function () { if (w.target()) w.step(3); });
    w.step(w.select ? 1 : 2);
    w.button.addEventListener("click", function (ev) {
      ev.preventDefault();
      var target = w.target();
      var file = w.file && w.file.files[0];
      if (!target) { w.say(w.root.getAttribute("data-msg-target"), "error"); return; }
      if (!file) { w.say(w.root.getAttribute("data-msg-file"), "error"); return; }
      w.button.disabled = true;
      w.say(w.root.getAttribute("data-msg-progress"), "busy");
      run(target, file).then(function () {
        w.step(4);
        w.say(w.root.getAttribute("data-msg-success"), "ok");
      }).catch(function (err) {
        w.say(w.root.getAttribute("data-msg-failure") + " (" + err.message + ")", "error");
      }).then(function () { w.button.disabled = false; });
    });
  }
  pagecraft.register("deUpload", function (cfg) {
    var w = widget(cfg);
    if (!w || !w.button) return;
    wire(w, function (target, file) {
      return file.text().then(function (text) {
        var rows = parseCsv(text, cfg.delimiter || ",");
        if (rows.length < 2) throw new Error("empty file");
        var header = rows[0].map(function (h) { return h.trim(); });
        var missing = (target.columns || []).filter(function (c) { return header.indexOf(c) < 0; });
        if (missing.length) throw new Error("missing columns: " + missing.join(", "));
        var records = rows.slice(1).map(function (r) {
          var rec = {};
          header.forEach(function (h, i) { rec[h] = r[i] === undefined ? "" : r[i]; });
          return rec;
        });
        return send(cfg, function (signal) {
          return {
            method: "POST",
            headers: { "Content-Type": "application/json" },
            body: JSON.stringify({ brandId: cfg.brandId, dataExtensionKey: target.dataExtensionKey, rows: records }),
            signal: signal
          };
        });
      });
    });
  });
  pagecraft.register("ftpUpload", function (cfg) {
    var w = widget(cfg);
    if (!w || !w.button) return;
    wire(w, function (target, file) {
      if (cfg.maxSizeMb && file.size > cfg.maxSizeMb * 1048576) return Promise.reject(new Error("file too large"));
      return send(cfg, function (signal) {
        var data = new FormData();
        data.append("brandId", cfg.brandId);
        data.append("path", target.ftpPath);
        data.append("filename", stamp(target.filenameTemplate, file.name));
        data.append("file", file);
        return { method: "POST", body: data, signal: signal };
      });
    });
  });
})();
"#;

const CALENDAR_JS: &str = r#"pagecraft.register("calendar", function (cfg) {
  var root = document.getElementById(cfg.el);
  if (!root) return;
  var link = root.querySelector("[data-pc-ics]");
  if (!link || !window.Blob) return;
  function esc(s) { return String(s || "").replace(/([,;\\])/g, "\\$1").replace(/\n/g, "\\n"); }
  link.addEventListener("click", function (ev) {
    ev.preventDefault();
    var e = cfg.event;
    var lines = ["BEGIN:VCALENDAR", "VERSION:2.0", "PRODID:-//pagecraft//EN", "BEGIN:VEVENT",
      "UID:" + cfg.el + "@pagecraft", "DTSTAMP:" + e.start,
      (e.timezone ? "DTSTART;TZID=" + e.timezone + ":" : "DTSTART:") + e.start,
      (e.timezone ? "DTEND;TZID=" + e.timezone + ":" : "DTEND:") + e.end,
      "SUMMARY:" + esc(e.title)];
    if (e.description) lines.push("DESCRIPTION:" + esc(e.description));
    if (e.location) lines.push("LOCATION:" + esc(e.location));
    lines.push("END:VEVENT", "END:VCALENDAR");
    var url = URL.createObjectURL(new Blob([lines.join("\r\n")], { type: "text/calendar;charset=utf-8" }));
    var a = document.createElement("a");
    a.href = url;
    a.download = (e.title || "event").replace(/[^A-Za-z0-9_-]+/g, "-") + ".ics";
    document.body.appendChild(a);
    a.click();
    setTimeout(function () { URL.revokeObjectURL(url); a.remove(); }, 0);
  });
});
"#;

const FLOATING_BUTTON_JS: &str = r#"pagecraft.register("floating", function (cfg) {
  var el = document.getElementById(cfg.el);
  if (!el || !cfg.showAfter) return;
  function update() { el.classList.toggle("pc-floating-visible", window.scrollY >= cfg.showAfter); }
  el.classList.add("pc-floating-deferred");
  window.addEventListener("scroll", update, { passive: true });
  update();
});
"#;

const COOKIE_BANNER_JS: &str = r#"pagecraft.register("cookies", function (cfg) {
  var el = document.getElementById(cfg.el);
  if (!el) return;
  if (pagecraft.store("local", cfg.key)) { el.remove(); return; }
  el.hidden = false;
  function answer(value) { pagecraft.store("local", cfg.key, value); el.remove(); }
  var accept = el.querySelector("[data-pc-accept]");
  var decline = el.querySelector("[data-pc-decline]");
  if (accept) accept.addEventListener("click", function () { answer("accepted"); });
  if (decline) decline.addEventListener("click", function () { answer("declined"); });
});
"#;

const FORM_CSS: &str = r#".pc-form{display:flex;flex-direction:column;gap:1rem;width:100%;max-width:560px;margin:0 auto;text-align:left;}
.pc-form .pc-field{display:flex;flex-direction:column;gap:.35rem;}
.pc-form label{font-weight:600;font-size:.95rem;}
.pc-form input,.pc-form select,.pc-form textarea{font:inherit;padding:.65rem .75rem;border:1px solid #d1d5db;border-radius:6px;background:#fff;color:inherit;}
.pc-form .pc-choice{display:flex;align-items:center;gap:.5rem;font-weight:400;}
.pc-form .pc-field-error{color:#b91c1c;font-size:.85rem;min-height:1em;}
.pc-form .pc-invalid input,.pc-form .pc-invalid select,.pc-form .pc-invalid textarea{border-color:#b91c1c;}
.pc-form-success{padding:1rem;border-radius:6px;background:#ecfdf5;color:#065f46;text-align:center;}
"#;

const ACCORDION_CSS: &str = r#".pc-accordion{width:100%;border-top:1px solid #e5e7eb;}
.pc-accordion-item{border-bottom:1px solid #e5e7eb;}
.pc-accordion-trigger{width:100%;display:flex;justify-content:space-between;align-items:center;padding:1rem 0;background:none;border:0;font:inherit;font-weight:600;text-align:left;cursor:pointer;color:inherit;}
.pc-accordion-trigger::after{content:"+";font-size:1.25rem;}
.pc-accordion-trigger[aria-expanded="true"]::after{content:"\2212";}
.pc-accordion-panel{padding:0 0 1rem;}
"#;

const TABS_CSS: &str = r#".pc-tabs{width:100%;}
.pc-tablist{display:flex;gap:.25rem;border-bottom:1px solid #e5e7eb;overflow-x:auto;}
.pc-tab{padding:.75rem 1rem;border:0;background:none;font:inherit;cursor:pointer;color:inherit;border-bottom:2px solid transparent;}
.pc-tab[aria-selected="true"]{border-bottom-color:var(--pc-theme);font-weight:600;}
.pc-tabpanel{padding:1rem 0;}
"#;

const POPUP_CSS: &str = r#".pc-popup{position:fixed;inset:0;z-index:1000;display:flex;align-items:center;justify-content:center;background:rgba(0,0,0,.55);padding:1rem;}
.pc-popup[hidden]{display:none;}
.pc-popup-dialog{position:relative;background:#fff;border-radius:10px;max-height:90vh;overflow:auto;width:100%;}
.pc-popup-close{position:absolute;top:.5rem;right:.75rem;border:0;background:none;font-size:1.5rem;cursor:pointer;line-height:1;}
"#;

const POLL_CSS: &str = r#".pc-poll{display:flex;flex-direction:column;gap:.75rem;align-items:center;text-align:center;width:100%;}
.pc-poll-options{display:flex;flex-wrap:wrap;gap:.5rem;justify-content:center;}
.pc-poll-option{padding:.6rem 1rem;border:1px solid var(--pc-theme);border-radius:6px;background:#fff;color:var(--pc-theme);font:inherit;cursor:pointer;}
.pc-nps-scale .pc-poll-option{min-width:2.5rem;padding:.5rem;}
.pc-nps-labels{display:flex;justify-content:space-between;width:100%;max-width:520px;font-size:.85rem;opacity:.75;}
.pc-poll-done .pc-poll-options{opacity:.5;}
"#;

const COUNTDOWN_CSS: &str = r#".pc-countdown{text-align:center;width:100%;}
.pc-countdown-clock{display:flex;gap:1rem;justify-content:center;}
.pc-countdown-unit{display:flex;flex-direction:column;align-items:center;min-width:3.5rem;}
.pc-countdown-value{font-size:2rem;font-weight:700;font-variant-numeric:tabular-nums;}
.pc-countdown-label{font-size:.75rem;text-transform:uppercase;letter-spacing:.05em;opacity:.7;}
"#;

const UPLOAD_CSS: &str = r#".pc-upload{display:flex;flex-direction:column;gap:.75rem;width:100%;max-width:560px;margin:0 auto;padding:1.25rem;border:1px dashed #cbd5e1;border-radius:10px;}
.pc-upload select,.pc-upload input[type="file"]{font:inherit;}
.pc-upload[data-step="1"] .pc-upload-file,.pc-upload[data-step="1"] .pc-upload-submit{opacity:.5;pointer-events:none;}
.pc-upload-status{font-size:.9rem;min-height:1.2em;}
.pc-upload-error{color:#b91c1c;}
.pc-upload-ok{color:#047857;}
"#;

const CALENDAR_CSS: &str = r#".pc-calendar{display:flex;flex-wrap:wrap;gap:.5rem;align-items:center;}
.pc-calendar-link{padding:.5rem .9rem;border:1px solid var(--pc-theme);border-radius:6px;color:var(--pc-theme);text-decoration:none;}
"#;

const FLOATING_BUTTON_CSS: &str = r#".pc-floating{position:fixed;z-index:900;padding:.85rem 1.25rem;border-radius:999px;box-shadow:0 6px 18px rgba(0,0,0,.2);text-decoration:none;font-weight:600;}
.pc-floating-bottom-right{right:1.25rem;bottom:1.25rem;}
.pc-floating-bottom-left{left:1.25rem;bottom:1.25rem;}
.pc-floating-top-right{right:1.25rem;top:1.25rem;}
.pc-floating-top-left{left:1.25rem;top:1.25rem;}
.pc-floating-deferred{opacity:0;pointer-events:none;transition:opacity .2s;}
.pc-floating-deferred.pc-floating-visible{opacity:1;pointer-events:auto;}
"#;

const COOKIE_BANNER_CSS: &str = r#".pc-cookies{position:fixed;left:0;right:0;z-index:1100;display:flex;flex-wrap:wrap;gap:.75rem;align-items:center;justify-content:center;padding:1rem;box-shadow:0 -2px 12px rgba(0,0,0,.15);}
.pc-cookies[hidden]{display:none;}
.pc-cookies-top{top:0;}
.pc-cookies-bottom{bottom:0;}
.pc-cookies button{font:inherit;padding:.5rem 1rem;border-radius:6px;border:0;cursor:pointer;}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_set_dedups_and_orders() {
        let mut set = ScriptSet::new();
        set.require(SharedScript::Tabs);
        set.require(SharedScript::FormValidation);
        set.require(SharedScript::Tabs);
        set.require(SharedScript::Core);
        let names: Vec<&str> = set.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["core", "form-validation", "tabs"]);
    }

    #[test]
    fn test_runtime_boots_after_handlers() {
        let mut set = ScriptSet::new();
        set.require(SharedScript::Accordion);
        let runtime = set.runtime(false).unwrap();
        let core = runtime.find("pc.register = function").unwrap();
        let handler = runtime.find("pagecraft.register(\"accordion\"").unwrap();
        let boot = runtime.find("pagecraft.boot();").unwrap();
        assert!(core < handler && handler < boot);
        assert_eq!(runtime.matches("pc.boot = function").count(), 1);
    }

    #[test]
    fn test_empty_set_has_no_runtime() {
        assert_eq!(ScriptSet::new().runtime(false), None);
    }

    #[test]
    fn test_enqueue_escapes_config() {
        let script = enqueue("tabs", &json!({"el": "</script><b>"}));
        assert_eq!(
            script,
            "<script>(window.__pcq=window.__pcq||[]).push([\"tabs\",{\"el\":\"\\u003c/script\\u003e\\u003cb\\u003e\"}]);</script>"
        );
    }

    #[test]
    fn test_minify_drops_blank_and_comment_lines() {
        assert_eq!(minify_source("  a();\n\n  // note\n    b();\n"), "a();\nb();\n");
    }

    #[test]
    fn test_shared_sources_do_not_contain_platform_tokens() {
        for script in [
            SharedScript::Core,
            SharedScript::FormValidation,
            SharedScript::FormConditions,
            SharedScript::Accordion,
            SharedScript::Tabs,
            SharedScript::PopUp,
            SharedScript::Poll,
            SharedScript::Countdown,
            SharedScript::Upload,
            SharedScript::AddToCalendar,
            SharedScript::FloatingButton,
            SharedScript::CookieBanner,
        ] {
            assert!(!script.js().contains("%%"), "{}", script.name());
            assert!(!script.js().contains("</script"), "{}", script.name());
        }
    }
}
