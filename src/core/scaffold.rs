//! Canonical project file templates.
//!
//! The patch layer relies on two fixed catalogs: `defaults()` are inserted
//! when the generator forgot a file entirely, and `canonical()` are known
//! trouble spots whose generated content is replaced wholesale with a
//! known-good form.

/// Files that must exist on disk after materialization.
pub const REQUIRED_FILES: &[&str] = &[
    "src/main.ts",
    "src/index.html",
    "src/styles.css",
    "src/app/app.component.ts",
    "src/app/app.component.html",
    "src/app/app.component.css",
    "src/app/app.routes.ts",
    "tsconfig.json",
    "angular.json",
    "package.json",
];

pub const TSCONFIG: &str = r#"{
  "compileOnSave": false,
  "compilerOptions": {
    "baseUrl": "./",
    "outDir": "./dist/out-tsc",
    "forceConsistentCasingInFileNames": true,
    "strict": true,
    "noImplicitOverride": true,
    "noPropertyAccessFromIndexSignature": true,
    "noImplicitReturns": true,
    "noFallthroughCasesInSwitch": true,
    "sourceMap": true,
    "declaration": false,
    "downlevelIteration": true,
    "experimentalDecorators": true,
    "moduleResolution": "node",
    "importHelpers": true,
    "target": "ES2022",
    "module": "ES2022",
    "useDefineForClassFields": false,
    "lib": ["ES2022", "dom"]
  },
  "angularCompilerOptions": {
    "enableI18nLegacyMessageIdFormat": false,
    "strictInjectionParameters": true,
    "strictInputAccessModifiers": true,
    "strictTemplates": true
  }
}"#;

pub const TSCONFIG_APP: &str = r#"{
  "extends": "./tsconfig.json",
  "compilerOptions": {
    "outDir": "./out-tsc/app",
    "types": [],
    "moduleResolution": "node",
    "target": "ES2022",
    "useDefineForClassFields": false
  },
  "files": ["src/main.ts", "src/polyfills.ts"],
  "include": ["src/**/*.d.ts", "src/**/*.ts"]
}"#;

pub const TSCONFIG_SPEC: &str = r#"{
  "extends": "./tsconfig.json",
  "compilerOptions": {
    "outDir": "./out-tsc/spec",
    "types": ["jasmine"]
  },
  "include": ["src/**/*.spec.ts", "src/**/*.d.ts"]
}"#;

pub const ANGULAR_JSON: &str = r#"{
  "$schema": "./node_modules/@angular/cli/lib/config/schema.json",
  "version": 1,
  "newProjectRoot": "projects",
  "projects": {
    "angular-app": {
      "projectType": "application",
      "schematics": {
        "@schematics/angular:component": {
          "style": "css",
          "standalone": true
        }
      },
      "root": "",
      "sourceRoot": "src",
      "prefix": "app",
      "architect": {
        "build": {
          "builder": "@angular-devkit/build-angular:application",
          "options": {
            "outputPath": "dist/angular-app",
            "index": "src/index.html",
            "browser": "src/main.ts",
            "polyfills": ["src/polyfills.ts"],
            "tsConfig": "tsconfig.app.json",
            "inlineStyleLanguage": "css",
            "assets": ["src/favicon.ico", "src/assets"],
            "styles": ["src/styles.css"],
            "scripts": []
          },
          "configurations": {
            "production": {
              "budgets": [
                {
                  "type": "initial",
                  "maximumWarning": "500kb",
                  "maximumError": "1mb"
                },
                {
                  "type": "anyComponentStyle",
                  "maximumWarning": "2kb",
                  "maximumError": "4kb"
                }
              ],
              "outputHashing": "all"
            },
            "development": {
              "optimization": false,
              "extractLicenses": false,
              "sourceMap": true
            }
          },
          "defaultConfiguration": "production"
        },
        "serve": {
          "builder": "@angular-devkit/build-angular:dev-server",
          "configurations": {
            "production": {
              "browserTarget": "angular-app:build:production"
            },
            "development": {
              "browserTarget": "angular-app:build:development"
            }
          },
          "defaultConfiguration": "development"
        },
        "test": {
          "builder": "@angular-devkit/build-angular:karma",
          "options": {
            "polyfills": ["src/polyfills.ts"],
            "tsConfig": "tsconfig.spec.json",
            "inlineStyleLanguage": "css",
            "assets": ["src/favicon.ico", "src/assets"],
            "styles": ["src/styles.css"],
            "scripts": []
          }
        }
      }
    }
  }
}"#;

pub const PACKAGE_JSON: &str = r#"{
  "name": "angular-app",
  "version": "0.0.0",
  "scripts": {
    "ng": "ng",
    "start": "ng serve",
    "build": "ng build",
    "watch": "ng build --watch --configuration development",
    "test": "ng test"
  },
  "private": true,
  "dependencies": {
    "@angular/animations": "^17.0.0",
    "@angular/common": "^17.0.0",
    "@angular/compiler": "^17.0.0",
    "@angular/core": "^17.0.0",
    "@angular/forms": "^17.0.0",
    "@angular/platform-browser": "^17.0.0",
    "@angular/platform-browser-dynamic": "^17.0.0",
    "@angular/router": "^17.0.0",
    "rxjs": "~7.8.0",
    "tslib": "^2.3.0",
    "zone.js": "~0.14.2"
  },
  "devDependencies": {
    "@angular-devkit/build-angular": "^17.0.0",
    "@angular/cli": "^17.0.0",
    "@angular/compiler-cli": "^17.0.0",
    "@types/jasmine": "~5.1.0",
    "jasmine-core": "~5.1.0",
    "karma": "~6.4.0",
    "karma-chrome-launcher": "~3.2.0",
    "karma-coverage": "~2.2.0",
    "karma-jasmine": "~5.1.0",
    "karma-jasmine-html-reporter": "~2.1.0",
    "typescript": "~5.2.2"
  }
}"#;

pub const MAIN_TS: &str = r#"import { bootstrapApplication } from '@angular/platform-browser';
import { appConfig } from './app/app.config';
import { AppComponent } from './app/app.component';

bootstrapApplication(AppComponent, appConfig)
  .catch((err) => console.error(err));"#;

pub const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Angular App</title>
  <base href="/">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <link rel="icon" type="image/x-icon" href="favicon.ico">
</head>
<body>
  <app-root></app-root>
</body>
</html>"#;

pub const STYLES_CSS: &str = r#"/* You can add global styles to this file, and also import other style files */
html, body { height: 100%; }
body { margin: 0; font-family: Roboto, "Helvetica Neue", sans-serif; }"#;

pub const POLYFILLS_TS: &str = r#"/**
 * This file includes polyfills needed by Angular and is loaded before the app.
 * You can add your own extra polyfills to this file.
 */
import 'zone.js';  // Included with Angular CLI."#;

pub const APP_CONFIG_TS: &str = r#"import { ApplicationConfig } from '@angular/core';
import { provideRouter } from '@angular/router';
import { provideHttpClient } from '@angular/common/http';
import { provideAnimations } from '@angular/platform-browser/animations';
import { routes } from './app.routes';

export const appConfig: ApplicationConfig = {
  providers: [
    provideRouter(routes),
    provideHttpClient(),
    provideAnimations()
  ]
};"#;

pub const APP_COMPONENT_TS: &str = r#"import { Component } from '@angular/core';
import { CommonModule } from '@angular/common';
import { RouterOutlet } from '@angular/router';

@Component({
  selector: 'app-root',
  standalone: true,
  imports: [CommonModule, RouterOutlet],
  templateUrl: './app.component.html',
  styleUrls: ['./app.component.css']
})
export class AppComponent {
  title = 'angular-app';
}"#;

pub const APP_COMPONENT_HTML: &str = "<main>\n  <router-outlet></router-outlet>\n</main>";

pub const APP_COMPONENT_CSS: &str = "main {\n  padding: 20px;\n}";

pub const ENVIRONMENT_TS: &str = "export const environment = {\n  production: false\n};\n";

pub const ENVIRONMENT_PROD_TS: &str = "export const environment = {\n  production: true\n};\n";

/// Inserted only when the generator omitted the file.
pub fn defaults() -> &'static [(&'static str, &'static str)] {
    &[
        ("tsconfig.json", TSCONFIG),
        ("tsconfig.app.json", TSCONFIG_APP),
        ("tsconfig.spec.json", TSCONFIG_SPEC),
        ("angular.json", ANGULAR_JSON),
        ("package.json", PACKAGE_JSON),
        ("src/main.ts", MAIN_TS),
        ("src/index.html", INDEX_HTML),
        ("src/styles.css", STYLES_CSS),
        ("src/polyfills.ts", POLYFILLS_TS),
        ("src/app/app.config.ts", APP_CONFIG_TS),
        ("src/app/app.component.ts", APP_COMPONENT_TS),
        ("src/app/app.component.html", APP_COMPONENT_HTML),
        ("src/app/app.component.css", APP_COMPONENT_CSS),
        ("src/environments/environment.ts", ENVIRONMENT_TS),
        ("src/environments/environment.prod.ts", ENVIRONMENT_PROD_TS),
    ]
}

/// Always overwritten with the known-good form, whatever the generator
/// produced for these paths.
pub fn canonical() -> &'static [(&'static str, &'static str)] {
    &[
        ("tsconfig.app.json", TSCONFIG_APP),
        ("angular.json", ANGULAR_JSON),
        ("src/styles.css", STYLES_CSS),
        ("src/polyfills.ts", POLYFILLS_TS),
        ("src/app/app.config.ts", APP_CONFIG_TS),
        ("src/app/app.component.ts", APP_COMPONENT_TS),
        ("src/app/app.component.html", APP_COMPONENT_HTML),
        ("src/app/app.component.css", APP_COMPONENT_CSS),
    ]
}
